//! API routes for the dispatch server.

pub mod deliveries;
pub mod drones;
pub mod geometry;
pub mod request_id;
mod routes;

use axum::http::StatusCode;
use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

/// Catalog failures surface as 502: the planner itself did nothing wrong.
pub(crate) fn catalog_error(err: anyhow::Error) -> StatusCode {
    tracing::error!("catalog request failed: {err:#}");
    StatusCode::BAD_GATEWAY
}
