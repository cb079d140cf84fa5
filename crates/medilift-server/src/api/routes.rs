//! REST API routes.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{deliveries, drones, geometry, request_id};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        // Geometry endpoints
        .route("/api/v1/distanceTo", post(geometry::distance_to))
        .route("/api/v1/isCloseTo", post(geometry::is_close_to))
        .route("/api/v1/nextPosition", post(geometry::next_position))
        .route("/api/v1/isInRegion", post(geometry::is_in_region))
        // Drone catalog queries
        .route(
            "/api/v1/dronesWithCooling/:state",
            get(drones::drones_with_cooling),
        )
        .route("/api/v1/droneDetails/:id", get(drones::drone_details))
        .route(
            "/api/v1/queryAsPath/:attribute/:value",
            get(drones::query_as_path),
        )
        .route("/api/v1/query", post(drones::query))
        .route(
            "/api/v1/queryAvailableDrones",
            post(drones::query_available_drones),
        )
        // Delivery planning
        .route("/api/v1/calcDeliveryPath", post(deliveries::calc_delivery_path))
        .route(
            "/api/v1/calcDeliveryPathAsGeoJson",
            post(deliveries::calc_delivery_path_as_geojson),
        )
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
