//! Planar geometry primitives for the 16-direction delivery grid.
//!
//! Longitude/latitude are treated as a flat Cartesian plane; one grid step is
//! `STEP_SIZE` coordinate units along one of 16 compass headings.

use thiserror::Error;

use crate::models::Position;

/// One grid step in coordinate units.
pub const STEP_SIZE: f64 = 0.00015;

/// Angular spacing between adjacent compass headings.
pub const COMPASS_DEGREES: f64 = 22.5;

/// The 16 allowed headings, in degrees counter-clockwise from due east.
pub const COMPASS_HEADINGS: [f64; 16] = [
    0.0, 22.5, 45.0, 67.5, 90.0, 112.5, 135.0, 157.5, 180.0, 202.5, 225.0, 247.5, 270.0, 292.5,
    315.0, 337.5,
];

/// Tolerance on the heading-multiple check.
const ANGLE_EPSILON: f64 = 1e-9;

/// Geometry contract violations. These indicate caller error; the planner
/// itself only ever feeds valid headings and pre-screened rings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("angle {0} is not a multiple of 22.5 degrees in [0, 360)")]
    InvalidAngle(f64),
    #[error("polygon ring must be closed and have at least 4 vertices")]
    InvalidPolygon,
    #[error("coordinate ({lng}, {lat}) is outside the valid longitude/latitude range")]
    OutOfRange { lng: f64, lat: f64 },
}

/// Euclidean distance between two positions, no geodesic correction.
pub fn distance(a: &Position, b: &Position) -> f64 {
    let dx = a.lng - b.lng;
    let dy = a.lat - b.lat;
    (dx * dx + dy * dy).sqrt()
}

/// True iff the two positions are less than one grid step apart.
pub fn is_close(a: &Position, b: &Position) -> bool {
    distance(a, b) < STEP_SIZE
}

/// Range check applied by the service layer before geometry calls.
pub fn validate_position(position: &Position) -> Result<(), GeometryError> {
    let out_of_range = !position.lat.is_finite()
        || !position.lng.is_finite()
        || position.lat < -90.0
        || position.lat > 90.0
        || position.lng < -180.0
        || position.lng > 180.0;
    if out_of_range {
        return Err(GeometryError::OutOfRange {
            lng: position.lng,
            lat: position.lat,
        });
    }
    Ok(())
}

/// Project one grid step from `start` along `angle_deg`.
pub fn step(start: &Position, angle_deg: f64) -> Result<Position, GeometryError> {
    validate_angle(angle_deg)?;
    let rad = angle_deg.to_radians();
    Ok(Position {
        lng: start.lng + STEP_SIZE * rad.cos(),
        lat: start.lat + STEP_SIZE * rad.sin(),
    })
}

fn validate_angle(angle_deg: f64) -> Result<(), GeometryError> {
    if !(0.0..360.0).contains(&angle_deg) {
        return Err(GeometryError::InvalidAngle(angle_deg));
    }
    let quotient = angle_deg / COMPASS_DEGREES;
    if (quotient - quotient.round()).abs() > ANGLE_EPSILON {
        return Err(GeometryError::InvalidAngle(angle_deg));
    }
    Ok(())
}

/// Ray-casting parity test against a closed ring (ring[0] == ring[last]).
///
/// A point is inside iff a ray cast due west crosses an odd number of edges.
pub fn point_in_polygon(point: &Position, ring: &[Position]) -> Result<bool, GeometryError> {
    if ring.len() < 4 {
        return Err(GeometryError::InvalidPolygon);
    }
    let (first, last) = (&ring[0], &ring[ring.len() - 1]);
    if first.lat != last.lat || first.lng != last.lng {
        return Err(GeometryError::InvalidPolygon);
    }

    let mut crossings = 0u32;
    for edge in ring.windows(2) {
        let (v1, v2) = (&edge[0], &edge[1]);
        if (v1.lat > point.lat) != (v2.lat > point.lat) {
            let edge_lng = (v2.lng - v1.lng) * (point.lat - v1.lat) / (v2.lat - v1.lat) + v1.lng;
            if point.lng < edge_lng {
                crossings += 1;
            }
        }
    }
    Ok(crossings % 2 == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring() -> Vec<Position> {
        vec![
            Position::new(0.0, 0.0),
            Position::new(0.01, 0.0),
            Position::new(0.01, 0.01),
            Position::new(0.0, 0.01),
            Position::new(0.0, 0.0),
        ]
    }

    #[test]
    fn step_moves_exactly_one_grid_unit_on_every_heading() {
        let start = Position::new(-3.19, 55.94);
        for angle in COMPASS_HEADINGS {
            let next = step(&start, angle).expect("valid heading");
            assert!(
                (distance(&start, &next) - STEP_SIZE).abs() < 1e-9,
                "heading {angle} moved a non-unit step"
            );
        }
    }

    #[test]
    fn step_rejects_off_compass_angles() {
        let start = Position::new(0.0, 0.0);
        for angle in [10.0, 30.0, 360.0, -22.5, 361.0] {
            assert_eq!(
                step(&start, angle),
                Err(GeometryError::InvalidAngle(angle)),
                "angle {angle} should be rejected"
            );
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn is_close_uses_strict_step_threshold() {
        let a = Position::new(0.0, 0.0);
        assert!(is_close(&a, &Position::new(STEP_SIZE * 0.9, 0.0)));
        assert!(!is_close(&a, &Position::new(STEP_SIZE, 0.0)));
    }

    #[test]
    fn validate_position_rejects_out_of_range_coordinates() {
        assert!(validate_position(&Position::new(-3.19, 55.94)).is_ok());
        assert!(validate_position(&Position::new(-181.0, 0.0)).is_err());
        assert!(validate_position(&Position::new(0.0, 90.5)).is_err());
        assert!(validate_position(&Position::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn point_in_polygon_detects_interior_and_exterior() {
        let ring = square_ring();
        assert!(point_in_polygon(&Position::new(0.005, 0.005), &ring).unwrap());
        assert!(!point_in_polygon(&Position::new(0.02, 0.005), &ring).unwrap());
        assert!(!point_in_polygon(&Position::new(-0.001, -0.001), &ring).unwrap());
    }

    #[test]
    fn point_in_polygon_rejects_malformed_rings() {
        let unclosed = vec![
            Position::new(0.0, 0.0),
            Position::new(0.01, 0.0),
            Position::new(0.01, 0.01),
            Position::new(0.0, 0.01),
        ];
        assert_eq!(
            point_in_polygon(&Position::new(0.005, 0.005), &unclosed),
            Err(GeometryError::InvalidPolygon)
        );
        let too_small = vec![
            Position::new(0.0, 0.0),
            Position::new(0.01, 0.0),
            Position::new(0.0, 0.0),
        ];
        assert_eq!(
            point_in_polygon(&Position::new(0.005, 0.005), &too_small),
            Err(GeometryError::InvalidPolygon)
        );
    }

    /// Classic pnpoly, used as an independent reference implementation.
    fn reference_contains(point: &Position, ring: &[Position]) -> bool {
        let mut inside = false;
        let n = ring.len();
        let mut j = n - 1;
        for i in 0..n {
            let (vi, vj) = (&ring[i], &ring[j]);
            if (vi.lat > point.lat) != (vj.lat > point.lat)
                && point.lng < (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    #[test]
    fn point_in_polygon_agrees_with_reference_on_a_grid() {
        let ring = vec![
            Position::new(0.0, 0.0),
            Position::new(0.012, 0.003),
            Position::new(0.009, 0.011),
            Position::new(0.002, 0.013),
            Position::new(-0.004, 0.006),
            Position::new(0.0, 0.0),
        ];

        let mut agree = 0u32;
        let mut total = 0u32;
        for i in 0..60 {
            for j in 0..60 {
                let point = Position::new(-0.01 + 0.0004 * i as f64, -0.005 + 0.0004 * j as f64);
                let ours = point_in_polygon(&point, &ring).expect("valid ring");
                if ours == reference_contains(&point, &ring) {
                    agree += 1;
                }
                total += 1;
            }
        }
        assert!(
            f64::from(agree) / f64::from(total) >= 0.95,
            "only {agree}/{total} grid points agreed with the reference"
        );
    }
}
