use color_eyre::eyre;
use color_eyre::eyre::eyre;
use geojson::JsonObject;
use serde::{Deserialize, Serialize};

/// Properties that are attached to a geojson feature
#[derive(Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub address: String,
    pub distance: f64,
    pub directions_url: String,
}

/// For converting FeatureProperties to geojson properties
impl TryFrom<FeatureProperties> for JsonObject {
    type Error = eyre::Error;

    fn try_from(value: FeatureProperties) -> Result<Self, Self::Error> {
        let value = serde_json::to_value(value)?;
        let properties = value
            .as_object()
            .ok_or(eyre!("Couldn't create object for properties"))?;
        Ok(properties.to_owned())
    }
}
