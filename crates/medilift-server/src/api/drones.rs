//! Drone catalog query endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use medilift_core::models::{Drone, MedDispatch};
use medilift_core::query::{self, QueryClause};

use crate::api::catalog_error;
use crate::state::AppState;

pub async fn drones_with_cooling(
    State(state): State<Arc<AppState>>,
    Path(cooling): Path<bool>,
) -> Result<Json<Vec<u32>>, StatusCode> {
    let drones = state.catalog.drones().await.map_err(catalog_error)?;
    Ok(Json(query::with_cooling(&drones, cooling)))
}

pub async fn drone_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Drone>, StatusCode> {
    let drone = state.catalog.drone(id).await.map_err(catalog_error)?;
    drone.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn query_as_path(
    State(state): State<Arc<AppState>>,
    Path((attribute, value)): Path<(String, String)>,
) -> Result<Json<Vec<u32>>, StatusCode> {
    let drones = state.catalog.drones().await.map_err(catalog_error)?;
    let ids = drones
        .iter()
        .filter(|drone| query::matches_attribute(drone, &attribute, &value))
        .map(|drone| drone.id)
        .collect();
    Ok(Json(ids))
}

pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(clauses): Json<Vec<QueryClause>>,
) -> Result<Json<Vec<u32>>, StatusCode> {
    let drones = state.catalog.drones().await.map_err(catalog_error)?;
    let ids = drones
        .iter()
        .filter(|drone| query::matches_all(drone, &clauses))
        .map(|drone| drone.id)
        .collect();
    Ok(Json(ids))
}

pub async fn query_available_drones(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<MedDispatch>>,
) -> Result<Json<Vec<u32>>, StatusCode> {
    let snapshot = state.catalog.snapshot().await.map_err(catalog_error)?;
    Ok(Json(query::drones_serving_all(&snapshot, &dispatches)))
}
