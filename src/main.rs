mod clients;
mod net;

use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Json, Router,
};
use clients::{get_config, get_finder, get_reqwest_client, CONFIG, FINDER, REQWEST};
use color_eyre::eyre::eyre;
use geojson::Feature;
use nearest_bite_server::{
    config::FinderConfig,
    types::dto::{
        geom::NearestQuery,
        place::{nearest_feature, NearestPlace},
    },
    Finder, NearestMatch, NominatimGeocoder, OverpassClient,
};
use net::response::{ResponseError, Result};
use tower_http::cors::CorsLayer;
use tracing::{info, instrument};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // initialize tracing
    tracing_subscriber::fmt::init();

    init_config()?;
    init_reqwest_client()?;
    init_finder()?;

    let app = Router::new()
        .route("/health", get(health))
        .route("/nearest", get(get_nearest))
        .route("/nearest/feature", get(get_nearest_feature))
        .layer(CorsLayer::permissive());

    let bind_addr = get_config()?.bind_addr;
    info!("Running on {bind_addr}");

    axum::Server::bind(&bind_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn init_config() -> color_eyre::Result<()> {
    let config = FinderConfig::from_env()?;
    info!(
        radius_meters = config.radius_meters,
        nominatim = %config.nominatim_url,
        overpass = %config.overpass_url,
        "Loaded config"
    );
    CONFIG
        .set(config)
        .map_err(|_| eyre!("Config already initialised"))
}

fn init_reqwest_client() -> color_eyre::Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(get_config()?.user_agent.as_str())
        .build()?;
    REQWEST
        .set(client)
        .map_err(|_| eyre!("Reqwest client already initialised"))
}

fn init_finder() -> color_eyre::Result<()> {
    let config = get_config()?;
    let client = get_reqwest_client()?;
    let finder = Finder::new(
        NominatimGeocoder::new(
            client.clone(),
            config.nominatim_url.as_str(),
            config.geocode_timeout,
        ),
        OverpassClient::new(
            client.clone(),
            config.overpass_url.as_str(),
            config.search_timeout,
        ),
    )
    .with_geocode_limit(config.geocode_limit);
    FINDER
        .set(finder)
        .map_err(|_| eyre!("Finder already initialised"))
}

async fn health() -> &'static str {
    "ok"
}

#[instrument]
async fn get_nearest(
    query: std::result::Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<NearestPlace>> {
    let Query(query) = query?;
    let found = locate(&query).await?;
    Ok(Json(NearestPlace::try_from(&found)?))
}

#[instrument]
async fn get_nearest_feature(
    query: std::result::Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<Feature>> {
    let Query(query) = query?;
    let found = locate(&query).await?;
    Ok(Json(nearest_feature(&found)?))
}

// Dropping this future (client went away) drops any in-flight upstream request with it
async fn locate(query: &NearestQuery) -> Result<NearestMatch> {
    let config = get_config()?;
    let origin = query.origin()?;
    let radius_meters = query.radius_or(config.radius_meters)?;
    get_finder()?
        .locate(&origin, &config.filter, radius_meters)
        .await
        .map_err(|e| ResponseError::pipeline(e, &config.category_label))
}
