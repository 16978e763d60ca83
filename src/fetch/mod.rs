mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Issues a GET for `url` and decodes the JSON body into `T`.
///
/// # Errors
///
/// Fails on transport errors, on any non-2xx status (the body is included in
/// the message), and when the body does not decode as `T`.
pub async fn get_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: reqwest::Url,
) -> Result<T> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await.context("request failed")?;
    let status = resp.status();
    let body = resp.bytes().await.context("failed to read response body")?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        return Err(anyhow::anyhow!("upstream returned status {}: {}", status, text));
    }

    serde_json::from_slice(&body).context("failed to parse response body")
}
