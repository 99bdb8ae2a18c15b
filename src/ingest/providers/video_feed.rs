// src/ingest/providers/video_feed.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::config::FeedCfg;
use crate::impact;
use crate::ingest::normalize;
use crate::ingest::transport::{HttpTransport, RequestOpts};
use crate::ingest::types::{Mention, SourceProvider};

pub const SOUNDS: [&str; 5] = [
    "Oh No - Kreepa",
    "Spongebob Fail",
    "Funny Laugh",
    "Original Sound - User123",
    "Trending Beat 2024",
];

pub const EFFECTS: [&str; 5] = [
    "Green Screen",
    "Time Warp Scan",
    "Disco Lights",
    "Beauty Mode",
    "Zoom In",
];

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<FeedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Co-authored posts repeat `<dc:creator>`; the first one is the author.
    #[serde(rename = "dc:creator", alias = "creator", default)]
    pub creators: Vec<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
}

impl FeedItem {
    pub fn author(&self) -> &str {
        self.creators.first().map(String::as_str).unwrap_or_default()
    }
}

fn parse_rfc2822(ts: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC))
}

/// Stand-in items used whenever the feed yields nothing.
pub fn fallback_items() -> Vec<FeedItem> {
    let stamp = Utc::now().to_rfc2822();
    [
        ("Viral Dance Challenge 2026", "http://tiktok.com/video1", "@dancer_01"),
        ("POV: You forgot your homework", "http://tiktok.com/video2", "@comedy_king"),
        ("Best Life Hacks for Students", "http://tiktok.com/video3", "@lifehacks"),
    ]
    .into_iter()
    .map(|(title, link, creator)| FeedItem {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        creators: vec![creator.to_string()],
        pub_date: Some(stamp.clone()),
    })
    .collect()
}

/// Pick `sound` and `effect` from a fast-changing clock reading.
/// The effect index uses half the reading so the two vary independently.
pub fn media_meta_for(clock_nanos: i64) -> BTreeMap<String, String> {
    let n = clock_nanos.unsigned_abs();
    let sound = SOUNDS[(n % SOUNDS.len() as u64) as usize];
    let effect = EFFECTS[((n / 2) % EFFECTS.len() as u64) as usize];
    BTreeMap::from([
        ("sound".to_string(), sound.to_string()),
        ("effect".to_string(), effect.to_string()),
    ])
}

fn clock_nanos(now: DateTime<Utc>) -> i64 {
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| i64::from(now.timestamp_subsec_nanos()))
}

/// RSS feed republished as short-video mentions. Never fails: an unreachable,
/// empty or unparsable feed is replaced by [`fallback_items`].
pub struct VideoFeedProvider {
    cfg: FeedCfg,
    transport: Arc<dyn HttpTransport>,
}

impl VideoFeedProvider {
    pub fn new(cfg: FeedCfg, transport: Arc<dyn HttpTransport>) -> Self {
        Self { cfg, transport }
    }

    pub fn parse_items_from_str(s: &str) -> Result<Vec<FeedItem>> {
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean).context("parsing feed rss xml")?;
        Ok(rss.channel.item)
    }

    async fn fetch_live_items(&self) -> Vec<FeedItem> {
        let opts = RequestOpts::new(Duration::from_secs(self.cfg.timeout_secs))
            .with_user_agent(self.cfg.user_agent.clone());
        let resp = match self.transport.get(&self.cfg.url, &opts).await {
            Ok(resp) if resp.is_success() => resp,
            Ok(resp) => {
                tracing::info!(source = self.name(), status = resp.status, "feed fetch not ok, using mock data");
                return Vec::new();
            }
            Err(e) => {
                tracing::info!(source = self.name(), error = ?e, "feed fetch failed, using mock data");
                return Vec::new();
            }
        };
        match Self::parse_items_from_str(&resp.body) {
            Ok(items) => items,
            Err(e) => {
                tracing::info!(source = self.name(), error = ?e, "feed unparsable, using mock data");
                Vec::new()
            }
        }
    }

    /// Turn (live or fallback) items into mentions; at most `max_items`.
    pub fn build_mentions(&self, items: Vec<FeedItem>) -> Vec<Mention> {
        items
            .into_iter()
            .take(self.cfg.max_items)
            .enumerate()
            .map(|(position, item)| {
                if let Some(published) = item.pub_date.as_deref().and_then(parse_rfc2822) {
                    tracing::debug!(source = self.name(), %published, "feed item pubDate");
                }
                let now = Utc::now();
                let nanos = clock_nanos(now);
                let imp = impact::estimate(item.author());
                normalize::feed_item(&item, nanos, position, media_meta_for(nanos), imp, now)
            })
            .collect()
    }
}

#[async_trait]
impl SourceProvider for VideoFeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<Mention>> {
        let t0 = std::time::Instant::now();
        let mut items = self.fetch_live_items().await;
        if items.is_empty() {
            tracing::info!(source = self.name(), "feed empty, generating mock data");
            counter!("collector_feed_fallback_total").increment(1);
            items = fallback_items();
        }
        let out = self.build_mentions(items);

        histogram!("collector_fetch_ms", "source" => self.name())
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("collector_mentions_fetched_total", "source" => self.name())
            .increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "VideoFeed"
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
