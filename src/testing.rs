//! In-memory stand-ins for the geocoder and the place search service, plus a
//! throwaway local http server for exercising the real clients.

use std::{
    collections::HashMap,
    f64::consts::PI,
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;

use crate::{
    error::{ResolutionError, SearchError},
    geocode::Geocoder,
    overpass::{PlaceSearch, TagFilter},
    place_geo::{Coordinate, EARTH_RADIUS_METERS},
    types::place::Candidate,
};

pub fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Serve `app` on an ephemeral local port, returning its base url
pub fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);
    format!("http://{addr}")
}

/// Base url of a port nothing is listening on
pub fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A candidate `meters` due north of `origin`
pub fn candidate_north_of(origin: Coordinate, meters: f64, name: &str) -> Candidate {
    let degrees = meters / EARTH_RADIUS_METERS * 180.0 / PI;
    Candidate {
        name: Some(name.to_string()),
        coordinate: Coordinate::new(origin.latitude + degrees, origin.longitude),
        tags: tags(&[("amenity", "fast_food"), ("name", name)]),
    }
}

#[derive(Clone)]
pub struct FakeGeocoder {
    result: Result<Vec<Coordinate>, String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeGeocoder {
    pub fn returning(matches: Vec<Coordinate>) -> Self {
        Self {
            result: Ok(matches),
            delay: None,
            calls: Arc::default(),
            queries: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::returning(vec![])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Coordinate>, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.result {
            Ok(matches) => Ok(matches.iter().copied().take(limit).collect()),
            Err(message) => Err(ResolutionError::LookupFailed(message.clone())),
        }
    }
}

/// Serves a fixed set of places, applying the tag filter the way the real service would
#[derive(Clone)]
pub struct FakeSearch {
    result: Result<Vec<Candidate>, String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    centers: Arc<Mutex<Vec<Coordinate>>>,
}

impl FakeSearch {
    pub fn returning(candidates: Vec<Candidate>) -> Self {
        Self {
            result: Ok(candidates),
            delay: None,
            calls: Arc::default(),
            centers: Arc::default(),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::returning(vec![])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn centers(&self) -> Vec<Coordinate> {
        self.centers.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearch for FakeSearch {
    async fn search(
        &self,
        center: Coordinate,
        _radius_meters: f64,
        filter: &TagFilter,
    ) -> Result<Vec<Candidate>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.centers.lock().unwrap().push(center);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.result {
            Ok(candidates) => Ok(candidates
                .iter()
                .filter(|candidate| filter.matches(&candidate.tags))
                .cloned()
                .collect()),
            Err(message) => Err(SearchError::ServiceUnavailable(message.clone())),
        }
    }
}
