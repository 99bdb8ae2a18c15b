// src/config/mod.rs
pub mod collector;

pub use collector::{
    CollectorConfig, FeedCfg, HackerNewsCfg, RedditCfg, StreamCfg, MENTIONS_TOPIC,
};
