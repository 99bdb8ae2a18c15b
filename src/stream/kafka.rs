// src/stream/kafka.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::time::Duration;

use super::{Delivery, StreamSink};
use crate::config::StreamCfg;

/// Kafka producer with `acks=all` and bounded producer-side retries.
#[derive(Clone)]
pub struct KafkaSink {
    producer: FutureProducer,
    broker: String,
    send_timeout: Duration,
}

impl KafkaSink {
    /// Build the producer without touching the network.
    pub fn create(cfg: &StreamCfg) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", cfg.broker.as_str())
            .set("acks", "all")
            .set("message.send.max.retries", cfg.send_retries.to_string())
            .set(
                "message.timeout.ms",
                cfg.send_timeout().as_millis().to_string(),
            )
            .create()
            .with_context(|| format!("creating kafka producer for {}", cfg.broker))?;

        Ok(Self {
            producer,
            broker: cfg.broker.clone(),
            send_timeout: cfg.send_timeout(),
        })
    }

    /// Build the producer and prove the broker answers a metadata request.
    pub async fn connect(cfg: &StreamCfg) -> Result<Self> {
        let sink = Self::create(cfg)?;
        sink.probe(cfg.probe_timeout()).await?;
        Ok(sink)
    }

    pub fn broker(&self) -> &str {
        &self.broker
    }

    async fn probe(&self, timeout: Duration) -> Result<()> {
        let producer = self.producer.clone();
        let brokers = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, timeout)
                .map(|md| md.brokers().len())
        })
        .await
        .context("kafka metadata probe task")?
        .with_context(|| format!("fetching metadata from {}", self.broker))?;

        tracing::debug!(broker = %self.broker, brokers, "kafka metadata probe ok");
        Ok(())
    }
}

#[async_trait]
impl StreamSink for KafkaSink {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<Delivery> {
        let record = FutureRecord::<(), [u8]>::to(topic).payload(payload);
        match self.producer.send(record, self.send_timeout).await {
            Ok((partition, offset)) => Ok(Delivery { partition, offset }),
            Err((e, _)) => Err(anyhow!("kafka send to {topic} failed: {e}")),
        }
    }
}
