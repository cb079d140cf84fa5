//! Delivery-path planning endpoints.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use medilift_core::models::{MedDispatch, RouteReport};
use medilift_core::{geojson, planner};

use crate::api::catalog_error;
use crate::state::AppState;

pub async fn calc_delivery_path(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<MedDispatch>>,
) -> Result<Json<RouteReport>, StatusCode> {
    let snapshot = state.catalog.snapshot().await.map_err(catalog_error)?;
    let report = planner::plan_deliveries(&snapshot, &dispatches);
    tracing::info!(
        dispatches = dispatches.len(),
        routed_drones = report.drone_paths.len(),
        total_moves = report.total_moves,
        "planned delivery routes"
    );
    Ok(Json(report))
}

pub async fn calc_delivery_path_as_geojson(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<MedDispatch>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let snapshot = state.catalog.snapshot().await.map_err(catalog_error)?;
    let report = planner::plan_deliveries(&snapshot, &dispatches);
    Ok(Json(geojson::route_as_geojson(&report)))
}
