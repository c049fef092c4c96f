//! Find the nearest place of a category (by default, somewhere selling chicken)
//! to a typed location or a device position.
//!
//! The pipeline is resolve -> search -> rank: the origin is geocoded through
//! nominatim unless it is already a coordinate, overpass is asked for tagged
//! places around it, and the closest candidate by haversine distance wins.

pub mod config;
pub mod directions;
pub mod error;
pub mod finder;
pub mod geocode;
pub mod overpass;
pub mod place_geo;
pub mod rank;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{PipelineError, ResolutionError, SearchError, Stage};
pub use finder::{Finder, NearestMatch, PipelineState};
pub use geocode::{Geocoder, NominatimGeocoder};
pub use overpass::{OverpassClient, PlaceSearch, TagFilter};
pub use place_geo::{distance, Coordinate, Distance};
pub use types::place::{Candidate, Origin, RankedPlace};
