use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::SearchError, place_geo::Coordinate, types::place::Candidate};

#[derive(Serialize, Deserialize, Debug)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

/// A node carries `lat`/`lon`, ways and relations carry `center` when queried with `out center`
#[derive(Serialize, Deserialize, Debug)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCoord>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct OverpassCoord {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Raw `(lat, lon)`, preferring the node position over a way/relation centre
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }

    /// Fails when the element has no position or one outside lat/lon bounds
    pub fn into_candidate(self) -> Result<Candidate, SearchError> {
        let label = format!("{} {}", self.element_type, self.id);
        let (lat, lon) = self
            .position()
            .ok_or_else(|| SearchError::MalformedResponse(format!("{label} has no position")))?;
        let coordinate = Coordinate::checked(lat, lon)
            .map_err(|e| SearchError::MalformedResponse(format!("{label}: {e}")))?;
        Ok(Candidate {
            name: self.tags.get("name").cloned(),
            coordinate,
            tags: self.tags,
        })
    }
}
