//! Data models for the dispatch planning engine.
//!
//! Everything here is a read-only snapshot for the duration of one planning
//! call; the engine never mutates an entity it was handed. Wire names follow
//! the fleet-catalog JSON format (camelCase).

use serde::{Deserialize, Serialize};

/// A (longitude, latitude) pair on the flat planning plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// A named polygon, as submitted to the containment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub name: Option<String>,
    pub vertices: Vec<Position>,
}

/// A drone record from the fleet catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub id: u32,
    pub name: String,
    pub capability: DroneCapability,
}

/// Per-drone capability and cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneCapability {
    pub capacity: f64,
    #[serde(default)]
    pub cooling: bool,
    #[serde(default)]
    pub heating: bool,
    pub cost_per_move: f64,
    pub cost_initial: f64,
    pub cost_final: f64,
    pub max_moves: u32,
}

/// A launch/return base for drones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub location: Position,
}

/// The drones stationed at one service point, with their weekly windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePointRoster {
    pub service_point_id: u32,
    pub drones: Vec<DroneAvailability>,
}

/// Association of one drone to a service point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneAvailability {
    pub id: u32,
    pub availability: Vec<AvailabilityWindow>,
}

/// A weekly time window during which a drone may fly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    /// Upper-case day name, e.g. "MONDAY".
    pub day_of_week: String,
    /// Start of the window, "HH:MM" or "HH:MM:SS".
    pub from: String,
    /// End of the window, inclusive.
    pub until: String,
}

/// Forbidden airspace given as a closed vertex ring (first == last).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictedArea {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<AltitudeLimits>,
    #[serde(default)]
    pub vertices: Vec<Position>,
}

/// Optional altitude band carried by the catalog; not used by the planner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AltitudeLimits {
    pub lower: f64,
    pub upper: f64,
}

/// One medical-delivery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedDispatch {
    pub id: u32,
    /// "YYYY-MM-DD"
    #[serde(default)]
    pub date: Option<String>,
    /// "HH:MM" or "HH:MM:SS"
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub requirements: Option<DispatchRequirements>,
    #[serde(default)]
    pub delivery: Option<Position>,
}

/// What a dispatch demands of the drone that serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequirements {
    pub capacity: f64,
    #[serde(default)]
    pub cooling: Option<bool>,
    #[serde(default)]
    pub heating: Option<bool>,
    #[serde(default)]
    pub max_cost: Option<f64>,
}

/// Planner output: totals plus every drone's flight segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub total_cost: f64,
    pub total_moves: u32,
    pub drone_paths: Vec<DronePath>,
}

/// The ordered flight segments assigned to one drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DronePath {
    pub drone_id: u32,
    pub deliveries: Vec<DeliverySegment>,
}

/// One leg of a drone's route. A delivery segment ends in two identical
/// coordinates (the hover); `delivery_id` is `None` for the final
/// return-to-base leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySegment {
    pub delivery_id: Option<u32>,
    pub flight_path: Vec<Position>,
}
