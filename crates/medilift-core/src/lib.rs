pub mod geojson;
pub mod geometry;
pub mod models;
pub mod pathfinder;
pub mod planner;
pub mod query;

pub use geometry::{GeometryError, COMPASS_HEADINGS, STEP_SIZE};
pub use models::{
    AvailabilityWindow, DeliverySegment, DispatchRequirements, Drone, DroneAvailability,
    DroneCapability, DronePath, MedDispatch, Position, Region, RestrictedArea, RouteReport,
    ServicePoint, ServicePointRoster,
};
pub use planner::{plan_deliveries, FleetSnapshot};
pub use query::QueryClause;
