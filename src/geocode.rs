use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::{
    error::ResolutionError,
    place_geo::Coordinate,
    types::{nominatim::NominatimSearchPlace, place::Origin},
};

/// Turns free text into candidate coordinates, best match first
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Coordinate>, ResolutionError>;
}

/// Resolve an origin to a single coordinate. Points are passed straight through,
/// text costs exactly one geocoder call.
#[instrument(skip(geocoder))]
pub async fn resolve<G>(
    geocoder: &G,
    origin: &Origin,
    limit: usize,
) -> Result<Coordinate, ResolutionError>
where
    G: Geocoder + ?Sized,
{
    match origin {
        Origin::Point(coordinate) => Ok(*coordinate),
        Origin::Text(text) => {
            let query = text.trim();
            if query.is_empty() {
                return Err(ResolutionError::NotFound);
            }
            let coordinate = geocoder
                .geocode(query, limit)
                .await?
                .into_iter()
                .next()
                .ok_or(ResolutionError::NotFound)?;
            info!(%coordinate, "resolved origin");
            Ok(coordinate)
        }
    }
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Coordinate>, ResolutionError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.search_url())
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::LookupFailed(format!(
                "geocoder responded with {status}"
            )));
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "geocoder response");
        Ok(parse_search_response(&body)?.into_iter().collect())
    }
}

/// Validate a nominatim search body and parse its best (first) match.
/// Entries after the first are never looked at.
pub fn parse_search_response(body: &str) -> Result<Option<Coordinate>, ResolutionError> {
    let places: Vec<NominatimSearchPlace> = serde_json::from_str(body)
        .map_err(|e| ResolutionError::LookupFailed(format!("unexpected geocoder response: {e}")))?;
    places.first().map(parse_place).transpose()
}

fn parse_place(place: &NominatimSearchPlace) -> Result<Coordinate, ResolutionError> {
    let parse = |field: &str, value: &str| {
        value.trim().parse::<f64>().map_err(|_| {
            ResolutionError::LookupFailed(format!("geocoder returned {field} {value:?}"))
        })
    };
    let latitude = parse("lat", &place.lat)?;
    let longitude = parse("lon", &place.lon)?;
    Coordinate::checked(latitude, longitude)
        .map_err(|e| ResolutionError::LookupFailed(e.to_string()))
}
