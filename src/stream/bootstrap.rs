// src/stream/bootstrap.rs
use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Call `connect` until it succeeds, at most `policy.attempts` times, sleeping
/// `policy.delay` between failures. Exhausting the budget is an error the
/// caller treats as fatal.
pub async fn connect_with_retry<T, F, Fut>(policy: RetryPolicy, mut connect: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match connect(attempt).await {
            Ok(conn) => return Ok(conn),
            Err(e) => {
                tracing::warn!(attempt, attempts, error = ?e, "stream connection attempt failed");
                last_err = Some(e);
            }
        }
        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    let err = last_err.unwrap_or_else(|| anyhow!("no connection attempt was made"));
    Err(err.context(format!("could not connect to stream after {attempts} attempts")))
}
