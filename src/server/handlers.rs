use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::alerts::QueryOptions;
use crate::serializer::{serialize_alerts, serialize_latest};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AlertParams {
    alert_query: Option<String>,
    period: Option<String>,
    geostore: Option<String>,
}

impl AlertParams {
    fn options(&self) -> QueryOptions {
        QueryOptions::from_raw(self.alert_query.as_deref(), self.period.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct LatestParams {
    limit: Option<String>,
}

/// `GET /admin/{iso}`
pub(super) async fn national(
    State(state): State<AppState>,
    Path(iso): Path<String>,
    Query(params): Query<AlertParams>,
) -> Result<Response, ApiError> {
    let result = state.service.by_admin(&iso, &params.options()).await?;
    Ok(Json(serialize_alerts(result.as_ref())).into_response())
}

/// `GET /admin/{iso}/{id1}`
pub(super) async fn subnational(
    State(state): State<AppState>,
    Path((iso, id1)): Path<(String, String)>,
    Query(params): Query<AlertParams>,
) -> Result<Response, ApiError> {
    let result = state
        .service
        .by_province(&iso, &id1, &params.options())
        .await?;
    Ok(Json(serialize_alerts(result.as_ref())).into_response())
}

/// `GET /use/{name}/{id}`
pub(super) async fn use_table(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
    Query(params): Query<AlertParams>,
) -> Result<Response, ApiError> {
    let result = state
        .service
        .by_use_table(&name, &id, &params.options())
        .await?;
    Ok(Json(serialize_alerts(result.as_ref())).into_response())
}

/// `GET /wdpa/{id}`
pub(super) async fn wdpa(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AlertParams>,
) -> Result<Response, ApiError> {
    let result = state
        .service
        .by_protected_area(&id, &params.options())
        .await?;
    Ok(Json(serialize_alerts(result.as_ref())).into_response())
}

/// `GET /?geostore=<hash>`; the caller's `x-api-key` is forwarded to the
/// geostore service.
pub(super) async fn world(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AlertParams>,
) -> Result<Response, ApiError> {
    let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    let result = state
        .service
        .by_polygon(params.geostore.as_deref(), &params.options(), api_key)
        .await?;
    Ok(Json(serialize_alerts(result.as_ref())).into_response())
}

/// `GET /latest?limit=<n>`
pub(super) async fn latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Result<Response, ApiError> {
    let dates = state.service.latest(params.limit.as_deref()).await?;
    Ok(Json(serialize_latest(&dates)).into_response())
}

/// `GET /healthcheck`
pub(super) async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "uptime": state.started.elapsed().as_secs() }))
}
