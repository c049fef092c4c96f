use serde::{Deserialize, Serialize};

/// One entry of a nominatim `/search?format=json` response.
/// Nominatim sends coordinates as decimal strings.
#[derive(Serialize, Deserialize, Debug)]
pub struct NominatimSearchPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
