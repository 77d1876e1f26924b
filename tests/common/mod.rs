#![allow(dead_code)]

use async_trait::async_trait;
use http_client::{Error, HttpClient, Request, Response};
use http_types::StatusCode;
use lastfm_api::{ClientConfig, LastFm};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request as seen by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

fn parse_form(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                urlencoding::decode(key).unwrap_or_default().into_owned(),
                urlencoding::decode(value).unwrap_or_default().into_owned(),
            )
        })
        .collect()
}

impl RecordedRequest {
    /// Look up a parameter from the query string or the form body.
    pub fn param(&self, key: &str) -> Option<String> {
        let query = self.url.split_once('?').map(|(_, q)| q).unwrap_or("");
        parse_form(query)
            .into_iter()
            .chain(parse_form(&self.body))
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.param(key).is_some()
    }
}

/// Shared view of everything the mock transport has served.
pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// HTTP client that answers from a fixed response queue and records every
/// request. Panics when the queue runs dry, so a test making more requests
/// than expected fails loudly.
#[derive(Debug)]
pub struct MockHttp {
    responses: Mutex<VecDeque<(u16, String)>>,
    requests: RequestLog,
}

impl MockHttp {
    pub fn new(responses: Vec<(u16, String)>) -> (Self, RequestLog) {
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                responses: Mutex::new(responses.into()),
                requests: requests.clone(),
            },
            requests,
        )
    }
}

#[async_trait]
impl HttpClient for MockHttp {
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

        let mut response = Response::new(StatusCode::try_from(status).unwrap());
        response.set_body(body);
        Ok(response)
    }
}

/// Build a client over a queue of 200-status JSON responses.
pub fn client(responses: Vec<Value>) -> (LastFm, RequestLog) {
    client_with_config(responses, ClientConfig::new("key", "secret"))
}

pub fn client_with_config(responses: Vec<Value>, config: ClientConfig) -> (LastFm, RequestLog) {
    let bodies = responses.into_iter().map(|v| (200, v.to_string())).collect();
    let (mock, log) = MockHttp::new(bodies);
    (LastFm::new(Box::new(mock), config), log)
}

/// Build a client over raw (status, body) responses.
pub fn client_with_raw(responses: Vec<(u16, String)>) -> (LastFm, RequestLog) {
    let (mock, log) = MockHttp::new(responses);
    (
        LastFm::new(Box::new(mock), ClientConfig::new("key", "secret")),
        log,
    )
}
