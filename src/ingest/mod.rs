// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod scheduler;
pub mod transport;
pub mod types;

use crate::ingest::types::SourceProvider;
use crate::stream::Publisher;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collector_ticks_total", "Scheduler ticks per source.");
        describe_counter!(
            "collector_mentions_fetched_total",
            "Mentions produced by providers."
        );
        describe_counter!(
            "collector_fetch_errors_total",
            "Provider cycles that failed as a whole."
        );
        describe_counter!(
            "collector_item_skipped_total",
            "Single items skipped inside an otherwise successful cycle."
        );
        describe_counter!(
            "collector_feed_fallback_total",
            "Feed cycles served from mock data."
        );
        describe_counter!("collector_publish_total", "Mentions accepted by the stream.");
        describe_counter!(
            "collector_publish_failures_total",
            "Mentions the stream rejected."
        );
        describe_histogram!("collector_fetch_ms", "Provider fetch time in milliseconds.");
    });
}

/// Fetch one source and publish whatever it produced.
/// Returns the batch size, or `None` if the fetch failed.
pub async fn poll_source(provider: &dyn SourceProvider, publisher: &Publisher) -> Option<usize> {
    let name = provider.name();
    match provider.fetch_latest().await {
        Ok(batch) => {
            tracing::info!(target: "ingest", source = name, count = batch.len(), "fetched mentions");
            publisher.publish(&batch).await;
            Some(batch.len())
        }
        Err(e) => {
            tracing::warn!(target: "ingest", source = name, error = ?e, "provider error");
            counter!("collector_fetch_errors_total", "source" => name).increment(1);
            None
        }
    }
}
