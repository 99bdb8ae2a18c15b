// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod impact;
pub mod ingest;
pub mod metrics;
pub mod stream;

pub use crate::config::CollectorConfig;
pub use crate::ingest::types::{Mention, Platform, Sentiment, SourceProvider};
pub use crate::stream::{Publisher, StreamSink};

use std::sync::Arc;

use axum::Router;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::MENTIONS_TOPIC;
use crate::ingest::providers::{HackerNewsProvider, RedditProvider, VideoFeedProvider};
use crate::ingest::scheduler::Scheduler;
use crate::ingest::transport::{HttpTransport, ReqwestTransport};
use crate::stream::bootstrap::{connect_with_retry, RetryPolicy};
use crate::stream::kafka::KafkaSink;

/// Install the fmt subscriber. `LOG_FORMAT=json` switches to JSON lines.
/// A no-op when the runtime already installed a global subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("echosight_collector=info,warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Wire a scheduler over the three built-in sources.
pub fn build_scheduler(
    cfg: &CollectorConfig,
    publisher: Publisher,
    transport: Arc<dyn HttpTransport>,
) -> Scheduler {
    Scheduler::new(publisher)
        .with_source(
            Box::new(RedditProvider::new(cfg.reddit.clone(), transport.clone())),
            cfg.reddit.interval(),
        )
        .with_source(
            Box::new(HackerNewsProvider::new(
                cfg.hackernews.clone(),
                transport.clone(),
            )),
            cfg.hackernews.interval(),
        )
        .with_source(
            Box::new(VideoFeedProvider::new(cfg.feed.clone(), transport)),
            cfg.feed.interval(),
        )
}

/// `/health`, plus `/metrics` when enabled. Installs the Prometheus recorder,
/// so call it before anything emits metrics.
pub fn http_router(cfg: &CollectorConfig) -> anyhow::Result<Router> {
    let mut router = api::router();
    if cfg.metrics_route {
        let m = crate::metrics::Metrics::init()?;
        router = router.merge(m.router());
    }
    Ok(router)
}

/// Connect to the stream (bounded retry, fatal when exhausted), start the
/// poller in the background, and return the HTTP router.
pub async fn start(cfg: CollectorConfig) -> anyhow::Result<Router> {
    let policy = RetryPolicy::new(cfg.stream.connect_attempts, cfg.stream.retry_delay());
    let sink = connect_with_retry(policy, |_attempt| KafkaSink::connect(&cfg.stream)).await?;
    info!(broker = %sink.broker(), "Connected to stream");

    // The recorder must exist before the poller describes its series.
    let router = http_router(&cfg)?;

    let publisher = Publisher::new(Arc::new(sink), MENTIONS_TOPIC).with_pacing(cfg.stream.pacing());
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new());
    build_scheduler(&cfg, publisher, transport).spawn();

    Ok(router)
}
