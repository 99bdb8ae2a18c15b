// src/impact.rs
//! Synthetic author influence.
//!
//! There is no follower data behind any of our sources, so popularity is
//! derived from the author handle itself: the same handle always maps to the
//! same follower count and score within a process run.

pub const MIN_FOLLOWERS: u32 = 100;
const FOLLOWER_MODULUS: u64 = 100_000;
const SEED_MULTIPLIER: u64 = 123;

/// Follower count and influence score attached to every mention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub followers: u32,
    /// Always within `[20, 100]`.
    pub score: f64,
}

/// Sum of the Unicode scalar values of `author`.
pub fn author_seed(author: &str) -> u64 {
    author
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(u32::from(c))))
}

/// Derive followers and score from an author handle.
pub fn estimate(author: &str) -> Impact {
    let seed = author_seed(author);
    let raw = seed.wrapping_mul(SEED_MULTIPLIER) % FOLLOWER_MODULUS;
    // raw < 100_000, fits in u32
    let followers = (raw as u32).max(MIN_FOLLOWERS);

    let score = (f64::from(followers) / FOLLOWER_MODULUS as f64 * 80.0 + 20.0).min(100.0);

    Impact { followers, score }
}
