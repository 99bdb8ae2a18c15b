// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logical platform label. These are simulated stand-ins, not the literal
/// source (Hacker News is published as "Twitter", the RSS feed as "TikTok").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    Reddit,
    Twitter,
    TikTok,
}

impl Platform {
    /// Prefix used when building canonical mention ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::TikTok => "tiktok",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Reddit => "Reddit",
            Platform::Twitter => "Twitter",
            Platform::TikTok => "TikTok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Placeholder only; sentiment is computed downstream.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    #[default]
    Neutral,
}

/// Canonical record published to the `social-mentions` topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mention {
    pub id: String,
    pub platform: Platform,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub author_followers: u32,
    pub impact_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_meta: Option<BTreeMap<String, String>>,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Mention>>;
    fn name(&self) -> &'static str;
}
