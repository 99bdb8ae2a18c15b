// src/api.rs
use axum::{routing::get, Router};

pub const HEALTH_BODY: &str = "Collector Service is operational";

/// Liveness only; the collector has no other HTTP surface.
pub fn router() -> Router {
    Router::new().route("/health", get(|| async { HEALTH_BODY }))
}
