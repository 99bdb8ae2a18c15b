// src/ingest/normalize.rs
//! Source shapes -> canonical [`Mention`]. Pure; the caller supplies "now"
//! and the already computed [`Impact`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::impact::Impact;
use crate::ingest::providers::{hackernews::HnItem, reddit::RedditPost, video_feed::FeedItem};
use crate::ingest::types::{Mention, Platform, Sentiment};

/// `<platform-prefix>_<native-id>`
pub fn canonical_id(platform: Platform, native_id: impl Display) -> String {
    format!("{}_{}", platform.id_prefix(), native_id)
}

/// Unix seconds -> UTC, falling back to `now` for zero or unrepresentable values.
pub fn unix_or_now(secs: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    if secs <= 0 {
        return now;
    }
    DateTime::from_timestamp(secs, 0).unwrap_or(now)
}

/// Hacker News users are published as Twitter-style handles.
pub fn twitter_handle(by: &str) -> String {
    format!("@{by}")
}

pub fn reddit_post(post: &RedditPost, impact: Impact, now: DateTime<Utc>) -> Mention {
    // created_utc arrives as a float; sub-second precision is dropped
    let secs = if post.created_utc.is_finite() {
        post.created_utc as i64
    } else {
        0
    };
    Mention {
        id: canonical_id(Platform::Reddit, &post.id),
        platform: Platform::Reddit,
        content: post.title.clone(),
        author: post.author.clone(),
        timestamp: unix_or_now(secs, now),
        sentiment: Sentiment::Neutral,
        author_followers: impact.followers,
        impact_score: impact.score,
        media_meta: None,
    }
}

/// `author` is the already prefixed handle the impact was computed from.
pub fn hn_item(item: &HnItem, author: String, impact: Impact, now: DateTime<Utc>) -> Mention {
    Mention {
        id: canonical_id(Platform::Twitter, item.id),
        platform: Platform::Twitter,
        content: item.title.clone().unwrap_or_default(),
        author,
        timestamp: unix_or_now(item.time.unwrap_or(0), now),
        sentiment: Sentiment::Neutral,
        author_followers: impact.followers,
        impact_score: impact.score,
        media_meta: None,
    }
}

/// Feed items have no stable id; one is synthesised from a clock reading and
/// the item's position in the batch. The record is always stamped `now`.
pub fn feed_item(
    item: &FeedItem,
    clock_nanos: i64,
    position: usize,
    media_meta: BTreeMap<String, String>,
    impact: Impact,
    now: DateTime<Utc>,
) -> Mention {
    let title = item.title.as_deref().unwrap_or_default();
    let content = match item.link.as_deref() {
        Some(link) if !link.is_empty() => format!("{title} {link}"),
        _ => title.to_string(),
    };
    Mention {
        id: canonical_id(Platform::TikTok, format!("{clock_nanos}_{position}")),
        platform: Platform::TikTok,
        content,
        author: item.author().to_string(),
        timestamp: now,
        sentiment: Sentiment::Neutral,
        author_followers: impact.followers,
        impact_score: impact.score,
        media_meta: Some(media_meta),
    }
}
