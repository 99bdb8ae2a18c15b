// src/ingest/providers/mod.rs
pub mod hackernews;
pub mod reddit;
pub mod video_feed;

pub use hackernews::HackerNewsProvider;
pub use reddit::RedditProvider;
pub use video_feed::VideoFeedProvider;
