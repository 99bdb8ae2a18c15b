// src/config/collector.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "COLLECTOR_CONFIG_PATH";
pub const ENV_KAFKA_BROKER: &str = "KAFKA_BROKER";
pub const ENV_METRICS_ROUTE: &str = "COLLECTOR_METRICS_ROUTE";

pub const DEFAULT_CONFIG_TOML: &str = "config/collector.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/collector.json";
pub const DEFAULT_BROKER: &str = "localhost:9092";
pub const CLIENT_USER_AGENT: &str = "EchoSight/1.0";

/// Topic every mention is published to. Not configurable.
pub const MENTIONS_TOPIC: &str = "social-mentions";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub stream: StreamCfg,
    pub reddit: RedditCfg,
    pub hackernews: HackerNewsCfg,
    pub feed: FeedCfg,
    /// Expose `/metrics` next to `/health`.
    pub metrics_route: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamCfg {
    pub broker: String,
    pub connect_attempts: u32,
    pub connect_retry_delay_secs: u64,
    /// Metadata round-trip used to prove the broker is reachable.
    pub connect_probe_timeout_secs: u64,
    /// Producer-level retries (`message.send.max.retries`).
    pub send_retries: u32,
    pub send_timeout_secs: u64,
    /// Pause between consecutive sends inside one batch.
    pub pacing_ms: u64,
}

impl Default for StreamCfg {
    fn default() -> Self {
        Self {
            broker: DEFAULT_BROKER.to_string(),
            connect_attempts: 10,
            connect_retry_delay_secs: 5,
            connect_probe_timeout_secs: 5,
            send_retries: 5,
            send_timeout_secs: 30,
            pacing_ms: 100,
        }
    }
}

impl StreamCfg {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_delay_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_probe_timeout_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditCfg {
    pub url: String,
    pub limit: usize,
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for RedditCfg {
    fn default() -> Self {
        Self {
            url: "https://www.reddit.com/r/technology/new.json".to_string(),
            limit: 5,
            interval_secs: 30,
            timeout_secs: 10,
            user_agent: Some(CLIENT_USER_AGENT.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerNewsCfg {
    pub ids_url: String,
    /// `{id}` is replaced with the story id.
    pub item_url: String,
    pub max_items: usize,
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HackerNewsCfg {
    fn default() -> Self {
        Self {
            ids_url: r#"https://hacker-news.firebaseio.com/v0/newstories.json?print=pretty&limitToFirst=5&orderBy="$key""#
                .to_string(),
            item_url: "https://hacker-news.firebaseio.com/v0/item/{id}.json".to_string(),
            max_items: 3,
            interval_secs: 45,
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl HackerNewsCfg {
    pub fn item_url_for(&self, id: u64) -> String {
        self.item_url.replace("{id}", &id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedCfg {
    pub url: String,
    pub max_items: usize,
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            url: "https://www.theverge.com/rss/index.xml".to_string(),
            max_items: 3,
            interval_secs: 60,
            timeout_secs: 5,
            user_agent: None,
        }
    }
}

impl RedditCfg {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl HackerNewsCfg {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl FeedCfg {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl CollectorConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading collector config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: Self = match ext.as_str() {
            "json" => serde_json::from_str(&content).context("parsing collector json")?,
            _ => toml::from_str(&content).context("parsing collector toml")?,
        };
        Ok(cfg)
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $COLLECTOR_CONFIG_PATH
    /// 2) config/collector.toml
    /// 3) config/collector.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = Self::load_file_default()?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    fn load_file_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        for p in [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    fn apply_env(&mut self) {
        if let Ok(broker) = std::env::var(ENV_KAFKA_BROKER) {
            let broker = broker.trim();
            if !broker.is_empty() {
                self.stream.broker = broker.to_string();
            }
        }
        if std::env::var(ENV_METRICS_ROUTE).ok().as_deref() == Some("1") {
            self.metrics_route = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stream.broker.trim().is_empty() {
            bail!("stream.broker must not be empty");
        }
        if self.stream.connect_attempts == 0 {
            bail!("stream.connect_attempts must be at least 1");
        }
        for (name, secs) in [
            ("reddit", self.reddit.interval_secs),
            ("hackernews", self.hackernews.interval_secs),
            ("feed", self.feed.interval_secs),
        ] {
            if secs == 0 {
                bail!("{name}.interval_secs must be positive");
            }
        }
        for (name, cap) in [
            ("reddit.limit", self.reddit.limit),
            ("hackernews.max_items", self.hackernews.max_items),
            ("feed.max_items", self.feed.max_items),
        ] {
            if cap == 0 {
                bail!("{name} must be positive");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let cfg = CollectorConfig::default();
        assert_eq!(cfg.stream.broker, "localhost:9092");
        assert_eq!(cfg.stream.connect_attempts, 10);
        assert_eq!(cfg.stream.send_retries, 5);
        assert_eq!(cfg.reddit.limit, 5);
        assert_eq!(cfg.reddit.interval(), Duration::from_secs(30));
        assert_eq!(cfg.hackernews.interval(), Duration::from_secs(45));
        assert_eq!(cfg.feed.interval(), Duration::from_secs(60));
        assert_eq!(cfg.feed.max_items, 3);
        assert!(!cfg.metrics_route);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: CollectorConfig = toml::from_str(
            r#"
[reddit]
limit = 10

[stream]
pacing_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.reddit.limit, 10);
        assert_eq!(cfg.reddit.interval_secs, 30);
        assert_eq!(cfg.stream.pacing(), Duration::ZERO);
        assert_eq!(cfg.stream.broker, DEFAULT_BROKER);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = CollectorConfig::default();
        cfg.feed.interval_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("feed.interval_secs"));
    }

    #[test]
    fn item_url_template() {
        let hn = HackerNewsCfg::default();
        assert_eq!(
            hn.item_url_for(42),
            "https://hacker-news.firebaseio.com/v0/item/42.json"
        );
    }
}
