// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RedditCfg;
use crate::impact;
use crate::ingest::normalize;
use crate::ingest::transport::{HttpTransport, RequestOpts};
use crate::ingest::types::{Mention, SourceProvider};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub created_utc: f64,
}

/// Newest posts from one subreddit listing.
pub struct RedditProvider {
    cfg: RedditCfg,
    transport: Arc<dyn HttpTransport>,
}

impl RedditProvider {
    pub fn new(cfg: RedditCfg, transport: Arc<dyn HttpTransport>) -> Self {
        Self { cfg, transport }
    }

    fn listing_url(&self) -> String {
        let sep = if self.cfg.url.contains('?') { '&' } else { '?' };
        format!("{}{}limit={}", self.cfg.url, sep, self.cfg.limit)
    }

    /// Parse a listing body into mentions, dropping repeated post ids.
    pub fn parse_listing(body: &str) -> Result<Vec<Mention>> {
        let listing: Listing = serde_json::from_str(body).context("parsing reddit listing json")?;
        let now = chrono::Utc::now();

        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::with_capacity(listing.data.children.len());
        for child in listing.data.children {
            let post = child.data;
            if !seen.insert(post.id.clone()) {
                continue;
            }
            let imp = impact::estimate(&post.author);
            out.push(normalize::reddit_post(&post, imp, now));
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch_latest(&self) -> Result<Vec<Mention>> {
        let t0 = std::time::Instant::now();
        let opts = RequestOpts::new(Duration::from_secs(self.cfg.timeout_secs))
            .with_user_agent(self.cfg.user_agent.clone());

        let resp = self
            .transport
            .get(&self.listing_url(), &opts)
            .await
            .context("reddit http get()")?
            .error_for_status("reddit api")?;
        let out = Self::parse_listing(&resp.body)?;

        histogram!("collector_fetch_ms", "source" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("collector_mentions_fetched_total", "source" => self.name())
            .increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_appends_limit() {
        struct Never;
        #[async_trait]
        impl HttpTransport for Never {
            async fn get(
                &self,
                _url: &str,
                _opts: &RequestOpts,
            ) -> Result<crate::ingest::transport::FetchResponse> {
                unreachable!()
            }
        }
        let p = RedditProvider::new(RedditCfg::default(), Arc::new(Never));
        assert_eq!(
            p.listing_url(),
            "https://www.reddit.com/r/technology/new.json?limit=5"
        );
    }

    #[test]
    fn malformed_listing_is_an_error() {
        assert!(RedditProvider::parse_listing(r#"{"data": 5}"#).is_err());
        assert!(RedditProvider::parse_listing("<html>").is_err());
    }

    #[test]
    fn empty_listing_is_ok() {
        let v = RedditProvider::parse_listing(r#"{"data":{"children":[]}}"#).unwrap();
        assert!(v.is_empty());
    }
}
