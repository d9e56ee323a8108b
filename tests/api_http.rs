// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use anyhow::{bail, Result};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use gold_rate_finder::api::{self, AppState};
use gold_rate_finder::sources::types::{Observation, PriceSource};
use gold_rate_finder::RateAggregator;

const BODY_LIMIT: usize = 1024 * 1024;

struct FixedSource(&'static str, u64);

#[async_trait]
impl PriceSource for FixedSource {
    async fn observe(&self) -> Result<Option<Observation>> {
        Ok(Some(Observation::new(self.1, self.0, "https://example.test/")))
    }
    fn name(&self) -> &str {
        self.0
    }
}

struct DownSource;

#[async_trait]
impl PriceSource for DownSource {
    async fn observe(&self) -> Result<Option<Observation>> {
        bail!("timeout")
    }
    fn name(&self) -> &str {
        "Down"
    }
}

fn test_router(sources: Vec<Box<dyn PriceSource>>) -> Router {
    api::router(AppState::new(RateAggregator::new(sources)))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_router(vec![]);
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "OK");
}

#[tokio::test]
async fn rates_are_a_sorted_array_of_records() {
    let app = test_router(vec![
        Box::new(DownSource),
        Box::new(FixedSource("Low", 500_000)),
        Box::new(FixedSource("High", 700_000)),
    ]);
    let (status, v) = get_json(app, "/api/rates").await;
    assert_eq!(status, StatusCode::OK);

    let arr = v.as_array().expect("array body");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["price"], 700_000);
    assert_eq!(arr[0]["price_text"], "700,000");
    assert_eq!(arr[0]["source"], "High");
    assert_eq!(arr[0]["url"], "https://example.test/");
    assert_eq!(arr[1]["source"], "Low");
}

#[tokio::test]
async fn no_data_is_an_explicit_error_object() {
    let app = test_router(vec![Box::new(DownSource)]);
    let (status, v) = get_json(app, "/api/rates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["error"], "No data found");
    assert_eq!(v["data"], serde_json::json!([]));
}

#[tokio::test]
async fn sources_lists_configured_names_in_order() {
    let app = test_router(vec![Box::new(DownSource), Box::new(FixedSource("A", 1))]);
    let (_, v) = get_json(app, "/api/sources").await;
    assert_eq!(v, serde_json::json!(["Down", "A"]));
}
