use std::future::Future;

use futures::{
    future::{self, Either},
    pin_mut,
};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
    error::{PipelineError, Stage},
    geocode::{resolve, Geocoder},
    overpass::{PlaceSearch, TagFilter},
    place_geo::Coordinate,
    rank::rank,
    types::place::{Origin, RankedPlace},
};

/// Where a single pipeline run currently is. Runs only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving,
    Searching,
    Ranking,
    Done,
    Failed(Stage),
}

impl PipelineState {
    /// The stage doing work in this state, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Resolving => Some(Stage::Resolve),
            PipelineState::Searching => Some(Stage::Search),
            PipelineState::Ranking => Some(Stage::Rank),
            _ => None,
        }
    }
}

/// The winning place together with the coordinate it was measured from
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    pub origin: Coordinate,
    pub place: RankedPlace,
}

/// Runs resolve -> search -> rank. Holds no per-request state, so one finder can
/// serve any number of concurrent calls.
pub struct Finder<G, S> {
    geocoder: G,
    places: S,
    geocode_limit: usize,
}

impl<G, S> Finder<G, S>
where
    G: Geocoder,
    S: PlaceSearch,
{
    pub fn new(geocoder: G, places: S) -> Self {
        Self {
            geocoder,
            places,
            geocode_limit: 1,
        }
    }

    pub fn with_geocode_limit(mut self, limit: usize) -> Self {
        self.geocode_limit = limit.max(1);
        self
    }

    pub async fn find_nearest(
        &self,
        origin: &Origin,
        filter: &TagFilter,
        radius_meters: f64,
    ) -> Result<RankedPlace, PipelineError> {
        self.locate(origin, filter, radius_meters)
            .await
            .map(|found| found.place)
    }

    pub async fn locate(
        &self,
        origin: &Origin,
        filter: &TagFilter,
        radius_meters: f64,
    ) -> Result<NearestMatch, PipelineError> {
        let (progress, _) = watch::channel(PipelineState::Idle);
        self.run(origin, filter, radius_meters, &progress).await
    }

    /// Like [`Finder::locate`], publishing every state change to `progress`
    pub async fn locate_with_progress(
        &self,
        origin: &Origin,
        filter: &TagFilter,
        radius_meters: f64,
        progress: &watch::Sender<PipelineState>,
    ) -> Result<NearestMatch, PipelineError> {
        self.run(origin, filter, radius_meters, progress).await
    }

    /// Race the pipeline against `cancel`. If `cancel` completes first the
    /// in-flight request is dropped with this future and the error names the stage
    /// that was running.
    pub async fn locate_until<C>(
        &self,
        origin: &Origin,
        filter: &TagFilter,
        radius_meters: f64,
        cancel: C,
    ) -> Result<NearestMatch, PipelineError>
    where
        C: Future<Output = ()>,
    {
        let (progress, _) = watch::channel(PipelineState::Idle);
        let run = self.run(origin, filter, radius_meters, &progress);
        pin_mut!(run);
        pin_mut!(cancel);
        match future::select(run, cancel).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                let stage = progress.borrow().stage().unwrap_or(Stage::Resolve);
                progress.send_replace(PipelineState::Failed(stage));
                warn!(%stage, "pipeline cancelled");
                Err(PipelineError::Cancelled { stage })
            }
        }
    }

    #[instrument(skip(self, filter, progress))]
    async fn run(
        &self,
        origin: &Origin,
        filter: &TagFilter,
        radius_meters: f64,
        progress: &watch::Sender<PipelineState>,
    ) -> Result<NearestMatch, PipelineError> {
        progress.send_replace(PipelineState::Resolving);
        let center = resolve(&self.geocoder, origin, self.geocode_limit)
            .await
            .map_err(|e| fail(progress, PipelineError::Resolve(e)))?;

        progress.send_replace(PipelineState::Searching);
        let candidates = self
            .places
            .search(center, radius_meters, filter)
            .await
            .map_err(|e| fail(progress, PipelineError::Search(e)))?;

        progress.send_replace(PipelineState::Ranking);
        let place = rank(&candidates, center)
            .ok_or_else(|| fail(progress, PipelineError::NoMatch { radius_meters }))?;

        info!(
            name = %place.name,
            distance_meters = place.distance_meters,
            candidates = candidates.len(),
            "nearest match"
        );
        progress.send_replace(PipelineState::Done);
        Ok(NearestMatch {
            origin: center,
            place,
        })
    }
}

fn fail(progress: &watch::Sender<PipelineState>, error: PipelineError) -> PipelineError {
    warn!(stage = %error.stage(), reason = error.reason(), "{error}");
    progress.send_replace(PipelineState::Failed(error.stage()));
    error
}
