// tests/common/mod.rs
//
// In-process stand-ins for the network and the stream.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use echosight_collector::ingest::transport::{FetchResponse, HttpTransport, RequestOpts};
use echosight_collector::stream::{Delivery, StreamSink};

enum Reply {
    Body(u16, String),
    Fail(String),
}

/// Answers GETs from a fixed url -> reply table. Unknown urls fail.
#[derive(Default)]
pub struct StubTransport {
    routes: HashMap<String, Reply>,
    pub calls: Mutex<Vec<(String, RequestOpts)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, url: &str, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Reply::Body(200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Reply::Body(status, body.to_string()));
        self
    }

    pub fn fail(mut self, url: &str, msg: &str) -> Self {
        self.routes
            .insert(url.to_string(), Reply::Fail(msg.to_string()));
        self
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str, opts: &RequestOpts) -> Result<FetchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), opts.clone()));
        match self.routes.get(url) {
            Some(Reply::Body(status, body)) => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Fail(msg)) => Err(anyhow!("{msg}")),
            None => Err(anyhow!("connection refused: {url}")),
        }
    }
}

/// Records every send; fails the calls whose 1-based index is in `fail_on`.
#[derive(Default)]
pub struct RecordingSink {
    fail_on: Vec<usize>,
    pub sent: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<serde_json::Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| serde_json::from_slice(p).unwrap())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl StreamSink for RecordingSink {
    async fn send(&self, topic: &str, payload: &[u8]) -> Result<Delivery> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((topic.to_string(), payload.to_vec()));
        let n = sent.len();
        if self.fail_on.contains(&n) {
            return Err(anyhow!("broker unavailable"));
        }
        Ok(Delivery {
            partition: 0,
            offset: n as i64 - 1,
        })
    }
}
