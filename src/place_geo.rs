use std::fmt;

use geo_types::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius used for great-circle distances, in metres
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 position. Latitude is expected in [-90, 90] and longitude in [-180, 180].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate from untrusted input, rejecting out of range (or NaN) values
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

// geo types are x/y, so longitude goes first
impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(value: Point<f64>) -> Self {
        Coordinate::new(value.y(), value.x())
    }
}

impl From<&Coordinate> for geojson::Value {
    fn from(value: &Coordinate) -> Self {
        (&Point::from(*value)).into()
    }
}

/// Great-circle (haversine) distance in metres between two positions
pub trait Distance<Rhs = Self> {
    fn distance_to(&self, other: &Rhs) -> f64;
}

impl Distance for Coordinate {
    fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

impl Distance for Point<f64> {
    fn distance_to(&self, other: &Point<f64>) -> f64 {
        Coordinate::from(*self).distance_to(&Coordinate::from(*other))
    }
}

impl Distance<Point<f64>> for Coordinate {
    fn distance_to(&self, other: &Point<f64>) -> f64 {
        self.distance_to(&Coordinate::from(*other))
    }
}

pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    a.distance_to(&b)
}

#[cfg(test)]
mod tests {
    use geo::HaversineDistance;

    use super::*;

    const MCKELDIN: Coordinate = Coordinate::new(38.9897, -76.9378);

    #[test]
    fn distance_to_self_is_zero() {
        for point in [
            Coordinate::new(0.0, 0.0),
            MCKELDIN,
            Coordinate::new(-89.9, 179.9),
            Coordinate::new(90.0, -180.0),
        ] {
            assert_eq!(distance(point, point), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (MCKELDIN, Coordinate::new(38.9935, -76.9401)),
            (Coordinate::new(51.5074, -0.1278), Coordinate::new(48.8566, 2.3522)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(35.6762, 139.6503)),
        ];
        for (a, b) in pairs {
            assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn agrees_with_geo_haversine() {
        // geo uses a slightly larger mean radius, so allow a few metres over ~3900km
        let nyc = Coordinate::new(40.7128, -74.0060);
        let la = Coordinate::new(34.0522, -118.2437);
        let ours = distance(nyc, la);
        let theirs = Point::from(nyc).haversine_distance(&Point::from(la));
        assert!((ours - theirs).abs() < 10.0, "{ours} vs {theirs}");
    }

    #[test]
    fn point_conversion_swaps_axes() {
        let point: Point<f64> = MCKELDIN.into();
        assert_eq!(point.x(), -76.9378);
        assert_eq!(point.y(), 38.9897);
        assert_eq!(Coordinate::from(point), MCKELDIN);
        assert_eq!(point.distance_to(&point), 0.0);
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert_eq!(Coordinate::checked(38.98, -76.94), Ok(Coordinate::new(38.98, -76.94)));
        assert_eq!(
            Coordinate::checked(91.0, 0.0),
            Err(CoordinateError::Latitude(91.0))
        );
        assert_eq!(
            Coordinate::checked(0.0, -180.5),
            Err(CoordinateError::Longitude(-180.5))
        );
        assert!(Coordinate::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn displays_as_lat_lon_pair() {
        assert_eq!(MCKELDIN.to_string(), "38.9897,-76.9378");
    }
}
