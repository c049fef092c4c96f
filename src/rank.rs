use crate::{
    place_geo::{Coordinate, Distance},
    types::place::{Candidate, RankedPlace},
};

pub const UNNAMED_PLACEHOLDER: &str = "Unnamed spot";
pub const ADDRESS_PLACEHOLDER: &str = "Nearby";

/// Address tags in the order they are printed
const ADDRESS_TAGS: [&str; 3] = ["addr:housenumber", "addr:street", "addr:city"];

impl RankedPlace {
    pub fn from_candidate(candidate: &Candidate, origin: Coordinate) -> Self {
        let name = candidate
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_PLACEHOLDER)
            .to_string();
        let address = ADDRESS_TAGS
            .iter()
            .filter_map(|tag| candidate.tags.get(*tag))
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        RankedPlace {
            name,
            coordinate: candidate.coordinate,
            address: if address.is_empty() {
                ADDRESS_PLACEHOLDER.to_string()
            } else {
                address
            },
            distance_meters: origin.distance_to(&candidate.coordinate),
        }
    }
}

/// Pick the candidate closest to `origin`. Ties go to whichever came first.
pub fn rank(candidates: &[Candidate], origin: Coordinate) -> Option<RankedPlace> {
    candidates
        .iter()
        .map(|candidate| RankedPlace::from_candidate(candidate, origin))
        .min_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters))
}
