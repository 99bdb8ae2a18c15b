//! EchoSight collector: binary entrypoint.
//! Polls Reddit, Hacker News and an RSS feed, publishes normalized mentions to
//! Kafka, and serves `/health` through the Shuttle Axum runtime.

use echosight_collector::{init_tracing, start, CollectorConfig};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = CollectorConfig::load_default()?;

    // No publish path, no service.
    let router = start(cfg).await?;

    Ok(router.into())
}
