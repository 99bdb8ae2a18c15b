// src/ingest/transport.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use std::time::Duration;

/// Per-request options. Every outbound call carries its own timeout.
#[derive(Debug, Clone)]
pub struct RequestOpts {
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl RequestOpts {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, ua: Option<String>) -> Self {
        self.user_agent = ua;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an error naming `what` was fetched.
    pub fn error_for_status(self, what: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(anyhow!("{what} returned status: {}", self.status))
        }
    }
}

/// `GET url -> status + body`. Sources only talk to the network through this.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, opts: &RequestOpts) -> Result<FetchResponse>;
}

#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, opts: &RequestOpts) -> Result<FetchResponse> {
        let mut req = self.client.get(url).timeout(opts.timeout);
        if let Some(ua) = &opts.user_agent {
            req = req.header(USER_AGENT, ua);
        }
        let resp = req.send().await.with_context(|| format!("GET {url}"))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        Ok(FetchResponse { status, body })
    }
}
