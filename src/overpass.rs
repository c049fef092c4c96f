use std::{collections::HashMap, fmt::Write, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    error::SearchError,
    place_geo::Coordinate,
    types::{
        overpass::{OverpassElement, OverpassResponse},
        place::Candidate,
    },
};

/// Which places count as a match: an amenity type plus a keyword hit on either
/// the name or the cuisine tag. Matching is case-insensitive substring.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TagFilter {
    pub amenities: Vec<String>,
    pub name_keywords: Vec<String>,
    pub cuisine_keywords: Vec<String>,
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::chicken()
    }
}

impl TagFilter {
    pub fn chicken() -> Self {
        Self {
            amenities: words(&["restaurant", "fast_food"]),
            name_keywords: words(&["chicken", "wing", "pollo", "peri-peri"]),
            cuisine_keywords: words(&["chicken", "fried_chicken", "wings"]),
        }
    }

    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        let tag_matches = |key: &str, patterns: &[String]| {
            tags.get(key).is_some_and(|value| {
                let value = value.to_lowercase();
                patterns
                    .iter()
                    .any(|pattern| value.contains(&pattern.to_lowercase()))
            })
        };
        tag_matches("amenity", &self.amenities[..])
            && (tag_matches("name", &self.name_keywords[..])
                || tag_matches("cuisine", &self.cuisine_keywords[..]))
    }

    /// Overpass QL tag predicates, one per non-empty keyword set
    fn predicates(&self) -> Vec<String> {
        let amenity = alternation(&self.amenities);
        [("name", &self.name_keywords), ("cuisine", &self.cuisine_keywords)]
            .into_iter()
            .filter(|(_, keywords)| !keywords.is_empty())
            .map(|(key, keywords)| {
                format!(
                    r#"["amenity"~"{}",i]["{}"~"{}",i]"#,
                    amenity,
                    key,
                    alternation(keywords)
                )
            })
            .collect()
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn alternation(patterns: &[String]) -> String {
    patterns
        .iter()
        .map(|p| escape_regex(p))
        .collect::<Vec<_>>()
        .join("|")
}

// Keywords are literal text; escape regex metacharacters and the QL string quoting
fn escape_regex(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                escaped.push_str("\\\\");
                escaped.push(c);
            }
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the Overpass QL for everything matching `filter` within `radius_meters` of `center`
pub fn build_query(
    center: Coordinate,
    radius_meters: f64,
    filter: &TagFilter,
    timeout: Duration,
) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout.as_secs().max(1));
    for predicate in filter.predicates() {
        // writing to a String cannot fail
        let _ = writeln!(
            query,
            "  nwr{}(around:{},{},{});",
            predicate, radius_meters, center.latitude, center.longitude
        );
    }
    query.push_str(");\nout center;\n");
    query
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        filter: &TagFilter,
    ) -> Result<Vec<Candidate>, SearchError>;
}

pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OverpassClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    fn interpreter_url(&self) -> String {
        format!("{}/api/interpreter", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PlaceSearch for OverpassClient {
    #[instrument(skip(self, filter))]
    async fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        filter: &TagFilter,
    ) -> Result<Vec<Candidate>, SearchError> {
        let query = build_query(center, radius_meters, filter, self.timeout);
        debug!(%query, "overpass query");
        let response = self
            .client
            .post(self.interpreter_url())
            .body(query)
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::ServiceUnavailable(format!(
                "overpass responded with {status}"
            )));
        }
        let body = response.text().await?;
        let candidates = parse_response(&body)?;
        info!(count = candidates.len(), "overpass candidates");
        Ok(candidates)
    }
}

/// Validate an overpass json body into candidates
pub fn parse_response(body: &str) -> Result<Vec<Candidate>, SearchError> {
    let response: OverpassResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
    response
        .elements
        .into_iter()
        .map(OverpassElement::into_candidate)
        .collect()
}
