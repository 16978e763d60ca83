//! Trait for the remote SQL service and the executor built on it.

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AlertsError;
use crate::sql::{QueryParams, QueryTemplate};

/// One result row: column name → value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Abstraction over a hosted SQL endpoint (e.g., CartoDB).
#[async_trait::async_trait]
pub trait SqlApi: Send + Sync {
    /// Runs `sql` and returns its rows. An empty result is `Ok(vec![])`.
    async fn query(&self, sql: &str) -> Result<Vec<Row>>;
}

/// Renders `template` with `params` and runs it.
///
/// # Errors
///
/// Template failures surface as [`AlertsError::Render`]; anything the remote
/// service reports, including timeouts, as [`AlertsError::Remote`].
#[tracing::instrument(skip(api, template, params), fields(template = template.name()))]
pub async fn execute(
    api: &dyn SqlApi,
    template: &QueryTemplate,
    params: &QueryParams,
) -> Result<Vec<Row>, AlertsError> {
    let sql = template.render(params)?;
    debug!(sql = %sql, "Executing query");

    let rows = api.query(&sql).await.map_err(AlertsError::Remote)?;
    debug!(rows = rows.len(), "Query returned");
    Ok(rows)
}

/// Decodes a row into a typed record.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, AlertsError> {
    serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|e| AlertsError::Remote(anyhow::Error::new(e).context("unexpected row shape")))
}
