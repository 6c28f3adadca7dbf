//! HTTP client helpers for tests.

use std::time::Duration;

use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub stage: Option<String>,
    pub body: Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read(resp: reqwest::Response) -> TestResponse {
        let status = resp.status().as_u16();
        let stage = resp
            .headers()
            .get("x-concierge-stage")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = resp.json().await.unwrap_or(Value::Null);
        TestResponse {
            status,
            stage,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        Self::read(resp).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST failed");
        Self::read(resp).await
    }

    pub async fn search(&self, query: &str) -> TestResponse {
        self.post("/v1/search", json!({ "query": query })).await
    }
}
