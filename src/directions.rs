use color_eyre::Result;
use reqwest::Url;

use crate::{place_geo::Coordinate, types::place::RankedPlace};

pub const GOOGLE_MAPS_DIRECTIONS: &str = "https://www.google.com/maps/dir/";

/// Google maps deep link from the resolved origin to `place`. Routing itself is left to maps.
pub fn directions_url(origin: &Coordinate, place: &RankedPlace) -> Result<Url> {
    let destination = format!("{} {}", place.name, place.address);
    Ok(Url::parse_with_params(
        GOOGLE_MAPS_DIRECTIONS,
        &[
            ("api", "1"),
            ("origin", origin.to_string().as_str()),
            ("destination", destination.as_str()),
        ],
    )?)
}
