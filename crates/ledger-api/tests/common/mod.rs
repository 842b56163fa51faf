//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use ledger_api::dispatch::{ChannelPublisher, IntegrationEvent, apply_integration_event};
use ledger_api::state::AppState;
use ledger_core::clock::Clock;
use ledger_test_support::{FixedClock, InMemoryEventStore};
use ledger_wallet::projection::{InMemoryDocumentStore, WalletDocumentStore};

/// A test application with direct handles on the read model and the
/// integration-event channel, so tests control when the projection runs.
pub struct TestApp {
    pub app: Router,
    pub documents: Arc<InMemoryDocumentStore>,
    pub events: UnboundedReceiver<IntegrationEvent>,
}

impl TestApp {
    /// Applies every integration event published so far, emulating the
    /// projection catching up with the ledger.
    pub async fn drain_projection(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            apply_integration_event(&event, self.documents.as_ref())
                .await
                .unwrap();
        }
    }
}

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
    ))
}

/// Build the full app router against the in-memory event store, with the
/// same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let (publisher, events) = ChannelPublisher::pair();
    let documents = Arc::new(InMemoryDocumentStore::new());
    let app_state = AppState::new(
        fixed_clock(),
        Arc::new(InMemoryEventStore::new()),
        Arc::new(publisher),
        Arc::clone(&documents) as Arc<dyn WalletDocumentStore>,
    );

    TestApp {
        app: ledger_api::app(app_state),
        documents,
        events,
    }
}

/// Send a POST request with a JSON body and return the response. An empty
/// response body (e.g. 204) is reported as JSON null.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}
