//! GeoJSON flattening of a route report for map display.
//!
//! This is a display convenience: the first drone's segments are joined into
//! one `LineString`, which is what the map frontend draws. It is not part of
//! the planning contract.

use serde_json::{json, Value};

use crate::models::RouteReport;

/// Flatten the first drone's flight path into a GeoJSON `Feature`.
pub fn route_as_geojson(report: &RouteReport) -> Value {
    let first = report.drone_paths.first();
    let drone_id = first.map(|path| path.drone_id);

    let mut coordinates: Vec<Value> = Vec::new();
    if let Some(path) = first {
        for segment in &path.deliveries {
            for point in &segment.flight_path {
                coordinates.push(json!([point.lng, point.lat]));
            }
        }
    }

    json!({
        "type": "Feature",
        "properties": { "droneId": drone_id },
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        }
    })
}
