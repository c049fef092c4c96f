use color_eyre::Result;
use geojson::{Feature, Geometry};
use serde::{Deserialize, Serialize};

use crate::{
    directions::directions_url,
    finder::NearestMatch,
    place_geo::Coordinate,
    types::feature::FeatureProperties,
};

/// What a nearest-place request answers with
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NearestPlace {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
    pub origin: Coordinate,
    pub directions_url: String,
}

impl TryFrom<&NearestMatch> for NearestPlace {
    type Error = color_eyre::Report;

    fn try_from(found: &NearestMatch) -> Result<Self> {
        let place = &found.place;
        Ok(NearestPlace {
            name: place.name.clone(),
            address: place.address.clone(),
            latitude: place.coordinate.latitude,
            longitude: place.coordinate.longitude,
            distance_meters: place.distance_meters,
            origin: found.origin,
            directions_url: directions_url(&found.origin, place)?.into(),
        })
    }
}

/// The winning place as a geojson point feature
pub fn nearest_feature(found: &NearestMatch) -> Result<Feature> {
    let place = &found.place;
    let properties = FeatureProperties {
        name: place.name.clone(),
        address: place.address.clone(),
        distance: place.distance_meters,
        directions_url: directions_url(&found.origin, place)?.into(),
    };
    Ok(Feature {
        geometry: Some(Geometry::new((&place.coordinate).into())),
        properties: Some(properties.try_into()?),
        ..Default::default()
    })
}
