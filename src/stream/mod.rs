// src/stream/mod.rs
pub mod bootstrap;
pub mod kafka;

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;

use crate::ingest::types::Mention;

/// Where a record landed on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// `publish(topic, bytes)`. Retrying is the sink's own business.
#[async_trait]
pub trait StreamSink: Send + Sync {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<Delivery>;
}

/// Serializes mentions and hands them to the sink one by one.
pub struct Publisher {
    sink: Arc<dyn StreamSink>,
    topic: String,
    pacing: Duration,
}

impl Publisher {
    pub fn new(sink: Arc<dyn StreamSink>, topic: impl Into<String>) -> Self {
        Self {
            sink,
            topic: topic.into(),
            pacing: Duration::from_millis(100),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Send every mention in order. A failed record is logged and dropped;
    /// the rest of the batch still goes out.
    pub async fn publish(&self, batch: &[Mention]) {
        for (i, mention) in batch.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let payload = match serde_json::to_vec(mention) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(id = %mention.id, error = ?e, "mention serialization failed");
                    counter!("collector_publish_failures_total").increment(1);
                    continue;
                }
            };

            match self.sink.send(&self.topic, &payload).await {
                Ok(d) => {
                    tracing::info!(
                        platform = %mention.platform,
                        partition = d.partition,
                        offset = d.offset,
                        content = %mention.content,
                        "mention published"
                    );
                    counter!("collector_publish_total").increment(1);
                }
                Err(e) => {
                    tracing::warn!(platform = %mention.platform, id = %mention.id, error = ?e, "failed to send mention");
                    counter!("collector_publish_failures_total").increment(1);
                }
            }
        }
    }
}
