use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::place_geo::Coordinate;

/// Where a search starts from
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Free-form address or place name, needs geocoding
    Text(String),
    /// Already resolved, e.g. from device geolocation
    Point(Coordinate),
}

/// Raw record returned by the proximity search
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub tags: HashMap<String, String>,
}

/// The normalised, distance-annotated winning candidate
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RankedPlace {
    pub name: String,
    pub coordinate: Coordinate,
    pub address: String,
    pub distance_meters: f64,
}
