// src/ingest/providers/hackernews.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HackerNewsCfg;
use crate::impact;
use crate::ingest::normalize;
use crate::ingest::transport::{HttpTransport, RequestOpts};
use crate::ingest::types::{Mention, SourceProvider};

#[derive(Debug, Clone, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
}

/// Newest Hacker News stories, republished as Twitter-style mentions.
///
/// One call for the id list, then one call per story. A failing story is
/// skipped; a failing id list fails the whole cycle.
pub struct HackerNewsProvider {
    cfg: HackerNewsCfg,
    transport: Arc<dyn HttpTransport>,
}

impl HackerNewsProvider {
    pub fn new(cfg: HackerNewsCfg, transport: Arc<dyn HttpTransport>) -> Self {
        Self { cfg, transport }
    }

    fn opts(&self) -> RequestOpts {
        RequestOpts::new(Duration::from_secs(self.cfg.timeout_secs))
            .with_user_agent(self.cfg.user_agent.clone())
    }

    async fn fetch_ids(&self) -> Result<Vec<u64>> {
        let resp = self
            .transport
            .get(&self.cfg.ids_url, &self.opts())
            .await
            .context("hn id list get()")?
            .error_for_status("hn id list")?;
        let ids: Vec<u64> = serde_json::from_str(&resp.body).context("parsing hn id list")?;

        let mut seen = HashSet::new();
        Ok(ids
            .into_iter()
            .take(self.cfg.max_items)
            .filter(|id| seen.insert(*id))
            .collect())
    }

    /// `Ok(None)` for deleted stories (the API answers `null`).
    async fn fetch_item(&self, id: u64) -> Result<Option<HnItem>> {
        let url = self.cfg.item_url_for(id);
        let resp = self
            .transport
            .get(&url, &self.opts())
            .await
            .with_context(|| format!("hn item {id} get()"))?
            .error_for_status("hn item")?;
        serde_json::from_str(&resp.body).with_context(|| format!("parsing hn item {id}"))
    }
}

#[async_trait]
impl SourceProvider for HackerNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<Mention>> {
        let t0 = std::time::Instant::now();
        let ids = self.fetch_ids().await?;

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let item = match self.fetch_item(id).await {
                Ok(Some(item)) => item,
                Ok(None) => {
                    tracing::debug!(source = self.name(), id, "hn item is null, skipping");
                    counter!("collector_item_skipped_total", "source" => self.name()).increment(1);
                    continue;
                }
                Err(e) => {
                    tracing::warn!(source = self.name(), id, error = ?e, "hn item skipped");
                    counter!("collector_item_skipped_total", "source" => self.name()).increment(1);
                    continue;
                }
            };
            if item.title.as_deref().unwrap_or_default().is_empty() {
                tracing::debug!(source = self.name(), id, "hn item untitled, skipped");
                counter!("collector_item_skipped_total", "source" => self.name()).increment(1);
                continue;
            }

            let author = normalize::twitter_handle(item.by.as_deref().unwrap_or_default());
            let imp = impact::estimate(&author);
            out.push(normalize::hn_item(&item, author, imp, chrono::Utc::now()));
        }

        histogram!("collector_fetch_ms", "source" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("collector_mentions_fetched_total", "source" => self.name())
            .increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "HackerNews"
    }
}
