//! In-crate test transport: an [`HttpClient`] that serves queued JSON
//! bodies and records every request it sees.

#![allow(dead_code)]

use crate::client::LastFm;
use crate::config::ClientConfig;
use async_trait::async_trait;
use http_client::{Error, HttpClient, Request, Response};
use http_types::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub(crate) struct QueuedHttp {
    responses: Mutex<VecDeque<(u16, String)>>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl QueuedHttp {
    pub fn new(bodies: Vec<serde_json::Value>) -> Self {
        Self {
            responses: Mutex::new(bodies.into_iter().map(|b| (200, b.to_string())).collect()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl HttpClient for QueuedHttp {
    async fn send(&self, req: Request) -> Result<Response, Error> {
        let mut req = req;
        let body = req.body_string().await.unwrap_or_default();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: req.method().to_string(),
            url: req.url().to_string(),
            body,
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock transport exhausted: more requests than queued responses");

        let status = StatusCode::try_from(status).expect("invalid mock status");
        let mut response = Response::new(status);
        response.set_body(body);
        Ok(response)
    }
}

pub(crate) fn client_with_responses(bodies: Vec<serde_json::Value>) -> LastFm {
    LastFm::new(
        Box::new(QueuedHttp::new(bodies)),
        ClientConfig::new("key", "secret"),
    )
}
