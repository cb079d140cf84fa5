//! Geometry endpoints mirroring the core primitives.
//!
//! All bodies are validated against coordinate ranges here; the core
//! pathfinder never re-checks them.

use axum::{http::StatusCode, Json};
use serde::Deserialize;

use medilift_core::geometry;
use medilift_core::models::{Position, Region};

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub position1: Position,
    pub position2: Position,
}

#[derive(Debug, Deserialize)]
pub struct NextPositionRequest {
    pub start: Position,
    pub angle: f64,
}

#[derive(Debug, Deserialize)]
pub struct IsInRegionRequest {
    pub position: Position,
    pub region: Region,
}

pub async fn distance_to(Json(request): Json<DistanceRequest>) -> Result<Json<f64>, StatusCode> {
    validate_pair(&request)?;
    Ok(Json(geometry::distance(
        &request.position1,
        &request.position2,
    )))
}

pub async fn is_close_to(Json(request): Json<DistanceRequest>) -> Result<Json<bool>, StatusCode> {
    validate_pair(&request)?;
    Ok(Json(geometry::is_close(
        &request.position1,
        &request.position2,
    )))
}

pub async fn next_position(
    Json(request): Json<NextPositionRequest>,
) -> Result<Json<Position>, StatusCode> {
    geometry::validate_position(&request.start).map_err(|_| StatusCode::BAD_REQUEST)?;
    geometry::step(&request.start, request.angle)
        .map(Json)
        .map_err(|_| StatusCode::BAD_REQUEST)
}

pub async fn is_in_region(
    Json(request): Json<IsInRegionRequest>,
) -> Result<Json<bool>, StatusCode> {
    geometry::validate_position(&request.position).map_err(|_| StatusCode::BAD_REQUEST)?;
    for vertex in &request.region.vertices {
        geometry::validate_position(vertex).map_err(|_| StatusCode::BAD_REQUEST)?;
    }
    geometry::point_in_polygon(&request.position, &request.region.vertices)
        .map(Json)
        .map_err(|_| StatusCode::BAD_REQUEST)
}

fn validate_pair(request: &DistanceRequest) -> Result<(), StatusCode> {
    geometry::validate_position(&request.position1)
        .and_then(|_| geometry::validate_position(&request.position2))
        .map_err(|_| StatusCode::BAD_REQUEST)
}
