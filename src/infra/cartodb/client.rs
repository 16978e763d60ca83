use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::fetch::{HttpClient, get_json};
use crate::services::sql_api::{Row, SqlApi};

/// Body returned by `GET /api/v2/sql`.
#[derive(Deserialize)]
struct SqlResponse {
    #[serde(default)]
    rows: Option<Vec<Row>>,
    #[serde(default)]
    error: Option<Vec<String>>,
}

/// Runs SQL through the CartoDB SQL API (`GET <sql_url>?q=<sql>`).
///
/// Authentication, when needed, is layered onto `C` with
/// [`UrlParam`](crate::fetch::auth::UrlParam).
pub struct CartoDbClient<C> {
    http: C,
    sql_url: reqwest::Url,
}

impl<C> CartoDbClient<C> {
    pub fn new(http: C, sql_url: &str) -> Result<Self> {
        let sql_url = reqwest::Url::parse(sql_url)
            .with_context(|| format!("invalid CartoDB SQL URL '{sql_url}'"))?;
        Ok(Self { http, sql_url })
    }
}

#[async_trait]
impl<C: HttpClient> SqlApi for CartoDbClient<C> {
    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let mut url = self.sql_url.clone();
        url.query_pairs_mut().append_pair("q", sql);

        let body: SqlResponse = get_json(&self.http, url)
            .await
            .context("CartoDB SQL request failed")?;

        if let Some(errors) = body.error {
            return Err(anyhow::anyhow!("CartoDB reported: {}", errors.join("; ")));
        }

        Ok(body.rows.unwrap_or_default())
    }
}
