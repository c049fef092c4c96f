use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Failures turning an origin into a coordinate
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("location lookup failed: {0}")]
    LookupFailed(String),
    #[error("location not found")]
    NotFound,
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures querying the tag search service
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("place search service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed place search response: {0}")]
    MalformedResponse(String),
    #[error("place search request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ResolutionError {
    pub fn reason(&self) -> &'static str {
        match self {
            ResolutionError::LookupFailed(_) => "lookup_failed",
            ResolutionError::NotFound => "not_found",
            ResolutionError::Transport(_) => "transport_failure",
        }
    }
}

impl SearchError {
    pub fn reason(&self) -> &'static str {
        match self {
            SearchError::ServiceUnavailable(_) => "service_unavailable",
            SearchError::MalformedResponse(_) => "malformed_response",
            SearchError::Transport(_) => "transport_failure",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Resolve,
    Search,
    Rank,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Resolve => "resolve",
            Stage::Search => "search",
            Stage::Rank => "rank",
        })
    }
}

/// The single error a pipeline run reports, tagged with the stage it came from
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("resolve stage failed: {0}")]
    Resolve(#[source] ResolutionError),
    #[error("search stage failed: {0}")]
    Search(#[source] SearchError),
    #[error("no candidates found within {radius_meters} m")]
    NoMatch { radius_meters: f64 },
    #[error("cancelled during {stage} stage")]
    Cancelled { stage: Stage },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Resolve(_) => Stage::Resolve,
            PipelineError::Search(_) => Stage::Search,
            PipelineError::NoMatch { .. } => Stage::Rank,
            PipelineError::Cancelled { stage } => *stage,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            PipelineError::Resolve(e) => e.reason(),
            PipelineError::Search(e) => e.reason(),
            PipelineError::NoMatch { .. } => "no_match",
            PipelineError::Cancelled { .. } => "cancelled",
        }
    }

    /// Text shown to whoever asked, e.g. "No chicken spots found within 2km"
    pub fn user_message(&self, category_label: &str) -> String {
        match self {
            PipelineError::Resolve(ResolutionError::NotFound) => "Location not found".to_string(),
            PipelineError::Resolve(_) => "Location lookup failed".to_string(),
            PipelineError::Search(_) => "Menu lookup failed".to_string(),
            PipelineError::NoMatch { radius_meters } => format!(
                "No {} found within {}",
                category_label,
                format_radius(*radius_meters)
            ),
            PipelineError::Cancelled { .. } => "Search cancelled".to_string(),
        }
    }
}

fn format_radius(radius_meters: f64) -> String {
    if radius_meters >= 1000.0 {
        let km = radius_meters / 1000.0;
        if km.fract() == 0.0 {
            format!("{km}km")
        } else {
            format!("{km:.1}km")
        }
    } else {
        format!("{}m", radius_meters.round())
    }
}
