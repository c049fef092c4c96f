use serde::Deserialize;
use thiserror::Error;

use crate::{
    place_geo::{Coordinate, CoordinateError},
    types::place::Origin,
};

/// Query string of a nearest-place request: either `q`, or `lat` and `lon` together
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NearestQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Error, Debug, PartialEq)]
pub enum OriginQueryError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error("lat and lon must be given together")]
    PartialPoint,
    #[error("provide a location with q, or lat and lon")]
    Missing,
    #[error("radius must be a positive number of metres, got {0}")]
    Radius(f64),
}

impl NearestQuery {
    /// Coordinates win over text when both are present, matching a device fix taking priority
    pub fn origin(&self) -> Result<Origin, OriginQueryError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Origin::Point(Coordinate::checked(lat, lon)?)),
            (Some(_), None) | (None, Some(_)) => Err(OriginQueryError::PartialPoint),
            (None, None) => match self.q.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => Ok(Origin::Text(text.to_string())),
                _ => Err(OriginQueryError::Missing),
            },
        }
    }

    pub fn radius_or(&self, default_meters: f64) -> Result<f64, OriginQueryError> {
        match self.radius {
            None => Ok(default_meters),
            Some(radius) if radius.is_finite() && radius > 0.0 => Ok(radius),
            Some(radius) => Err(OriginQueryError::Radius(radius)),
        }
    }
}
