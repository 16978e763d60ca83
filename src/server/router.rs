use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

pub const PREFIX: &str = "/api/v1/quicc-alerts";

/// Service handed to the listener.
pub type App = NormalizePath<Router>;

pub fn router(state: AppState) -> Router {
    let alerts = Router::new()
        .route("/", get(handlers::world))
        .route("/latest", get(handlers::latest))
        .route("/admin/:iso", get(handlers::national))
        .route("/admin/:iso/:id1", get(handlers::subnational))
        .route("/use/:name/:id", get(handlers::use_table))
        .route("/wdpa/:id", get(handlers::wdpa));

    Router::new()
        .nest(PREFIX, alerts)
        .route("/healthcheck", get(handlers::healthcheck))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// [`router`] with trailing slashes trimmed before routing, so
/// `/api/v1/quicc-alerts/` and `/admin/BRA/` match like their bare forms.
pub fn app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
