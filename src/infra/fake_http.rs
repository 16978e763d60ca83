//! Canned-response [`HttpClient`] for exercising the infra clients offline.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::fetch::HttpClient;

/// What the fake saw of one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub url: reqwest::Url,
    pub headers: reqwest::header::HeaderMap,
}

pub struct FakeHttp {
    status: u16,
    body: String,
    pub seen: Mutex<Vec<SeenRequest>>,
}

impl FakeHttp {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn last(&self) -> SeenRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request seen")
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.seen.lock().unwrap().push(SeenRequest {
            url: req.url().clone(),
            headers: req.headers().clone(),
        });
        let resp = http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json")
            .body(self.body.clone())
            .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}
