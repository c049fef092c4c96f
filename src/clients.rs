use std::sync::OnceLock;

use color_eyre::eyre::{eyre, Result};
use nearest_bite_server::{config::FinderConfig, Finder, NominatimGeocoder, OverpassClient};

pub type PlaceFinder = Finder<NominatimGeocoder, OverpassClient>;

pub static CONFIG: OnceLock<FinderConfig> = OnceLock::new();
pub static REQWEST: OnceLock<reqwest::Client> = OnceLock::new();
pub static FINDER: OnceLock<PlaceFinder> = OnceLock::new();

pub fn get_config() -> Result<&'static FinderConfig> {
    CONFIG.get().ok_or(eyre!("Failed to get config"))
}

pub fn get_reqwest_client() -> Result<&'static reqwest::Client> {
    REQWEST.get().ok_or(eyre!("Failed to get reqwest client"))
}

pub fn get_finder() -> Result<&'static PlaceFinder> {
    FINDER.get().ok_or(eyre!("Failed to get finder"))
}
