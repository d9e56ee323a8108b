// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;

use crate::aggregate::{NoDataBody, RateAggregator, RatesOutcome};

pub const INDEX_PATH: &str = "static/index.html";

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<RateAggregator>,
}

impl AppState {
    pub fn new(aggregator: RateAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(INDEX_PATH))
        .route("/health", get(|| async { "OK" }))
        .route("/api/rates", get(api_rates))
        .route("/api/sources", get(api_sources))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Fresh collection on every call; nothing is cached between requests.
async fn api_rates(State(state): State<AppState>) -> Response {
    match state.aggregator.collect().await {
        RatesOutcome::Found(rates) => Json(rates).into_response(),
        RatesOutcome::NoData => Json(NoDataBody::default()).into_response(),
    }
}

async fn api_sources(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.aggregator.source_names())
}
