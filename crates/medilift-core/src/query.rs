//! Predicate matching over drone records.
//!
//! Supports the single attribute/value filter, compound operator queries,
//! and the fleet-wide "which drones can serve this whole dispatch list"
//! check. Unknown attributes and unparseable values match nothing; they are
//! never an error.

use tracing::warn;

use crate::geometry;
use crate::models::{Drone, MedDispatch};
use crate::planner::{is_available_for, FleetSnapshot};
use serde::{Deserialize, Serialize};

/// One clause of a compound query, AND-combined with its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryClause {
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Ids of drones whose cooling flag equals `state`, input order.
pub fn with_cooling(drones: &[Drone], state: bool) -> Vec<u32> {
    drones
        .iter()
        .filter(|drone| drone.capability.cooling == state)
        .map(|drone| drone.id)
        .collect()
}

/// Equality match of one attribute against a string value.
pub fn matches_attribute(drone: &Drone, attribute: &str, value: &str) -> bool {
    let capability = &drone.capability;
    match attribute.to_ascii_lowercase().as_str() {
        "id" => value.parse::<u32>().is_ok_and(|v| drone.id == v),
        "name" => drone.name.eq_ignore_ascii_case(value),
        "capacity" => value.parse::<f64>().is_ok_and(|v| capability.capacity == v),
        "cooling" => bool_name(capability.cooling).eq_ignore_ascii_case(value),
        "heating" => bool_name(capability.heating).eq_ignore_ascii_case(value),
        "costpermove" => value.parse::<f64>().is_ok_and(|v| capability.cost_per_move == v),
        "costinitial" => value.parse::<f64>().is_ok_and(|v| capability.cost_initial == v),
        "costfinal" => value.parse::<f64>().is_ok_and(|v| capability.cost_final == v),
        "maxmoves" => value.parse::<u32>().is_ok_and(|v| capability.max_moves == v),
        _ => false,
    }
}

/// True when the drone satisfies every clause.
pub fn matches_all(drone: &Drone, clauses: &[QueryClause]) -> bool {
    clauses.iter().all(|clause| matches_clause(drone, clause))
}

fn matches_clause(drone: &Drone, clause: &QueryClause) -> bool {
    let (Some(attribute), Some(operator), Some(value)) = (
        clause.attribute.as_deref(),
        clause.operator.as_deref(),
        clause.value.as_deref(),
    ) else {
        warn!(?clause, "query clause has missing fields");
        return false;
    };

    let capability = &drone.capability;
    match attribute.to_ascii_lowercase().as_str() {
        "id" => value
            .parse::<u32>()
            .is_ok_and(|v| compare_ordered(drone.id, operator, v)),
        "capacity" => value
            .parse::<f64>()
            .is_ok_and(|v| compare_ordered(capability.capacity, operator, v)),
        "maxmoves" => value
            .parse::<u32>()
            .is_ok_and(|v| compare_ordered(capability.max_moves, operator, v)),
        "costpermove" => value
            .parse::<f64>()
            .is_ok_and(|v| compare_ordered(capability.cost_per_move, operator, v)),
        "costinitial" => value
            .parse::<f64>()
            .is_ok_and(|v| compare_ordered(capability.cost_initial, operator, v)),
        "costfinal" => value
            .parse::<f64>()
            .is_ok_and(|v| compare_ordered(capability.cost_final, operator, v)),
        "cooling" => value
            .parse::<bool>()
            .is_ok_and(|v| compare_equality(capability.cooling, operator, v)),
        "heating" => value
            .parse::<bool>()
            .is_ok_and(|v| compare_equality(capability.heating, operator, v)),
        "name" => compare_equality(drone.name.as_str(), operator, value),
        _ => false,
    }
}

fn compare_ordered<T: PartialOrd>(left: T, operator: &str, right: T) -> bool {
    match operator {
        "=" => left == right,
        "!=" => left != right,
        "<" => left < right,
        ">" => left > right,
        _ => false,
    }
}

fn compare_equality<T: PartialEq>(left: T, operator: &str, right: T) -> bool {
    match operator {
        "=" => left == right,
        "!=" => left != right,
        _ => false,
    }
}

fn bool_name(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Ids of drones able to serve every dispatch in the list: capability match,
/// an availability window at some service point, and a straight-line cost
/// estimate within the dispatch ceiling.
pub fn drones_serving_all(snapshot: &FleetSnapshot, dispatches: &[MedDispatch]) -> Vec<u32> {
    snapshot
        .drones
        .iter()
        .filter(|drone| serves_all(drone, dispatches, snapshot))
        .map(|drone| drone.id)
        .collect()
}

fn serves_all(drone: &Drone, dispatches: &[MedDispatch], snapshot: &FleetSnapshot) -> bool {
    let capability = &drone.capability;
    for dispatch in dispatches {
        let Some(requirements) = dispatch.requirements.as_ref() else {
            warn!(dispatch = dispatch.id, "dispatch has no requirements block");
            return false;
        };
        if capability.capacity < requirements.capacity {
            return false;
        }
        if requirements.cooling == Some(true) && !capability.cooling {
            return false;
        }
        if requirements.heating == Some(true) && !capability.heating {
            return false;
        }
        if !has_serving_point(drone, dispatch, snapshot) {
            return false;
        }
    }
    true
}

fn has_serving_point(drone: &Drone, dispatch: &MedDispatch, snapshot: &FleetSnapshot) -> bool {
    let Some(delivery) = dispatch.delivery else {
        return false;
    };
    let capability = &drone.capability;

    for roster in &snapshot.rosters {
        for availability in roster.drones.iter().filter(|entry| entry.id == drone.id) {
            if !is_available_for(availability, dispatch.date.as_deref(), dispatch.time.as_deref())
            {
                continue;
            }
            let Some(service_point) = snapshot
                .service_points
                .iter()
                .find(|point| point.id == roster.service_point_id)
            else {
                continue;
            };

            let distance = geometry::distance(&service_point.location, &delivery);
            let estimate =
                capability.cost_initial + capability.cost_final + distance * capability.cost_per_move;
            let over_ceiling = dispatch
                .requirements
                .as_ref()
                .and_then(|requirements| requirements.max_cost)
                .is_some_and(|ceiling| estimate > ceiling);
            if over_ceiling {
                continue;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AvailabilityWindow, DispatchRequirements, DroneAvailability, DroneCapability, Position,
        ServicePoint, ServicePointRoster,
    };

    fn fleet() -> Vec<Drone> {
        vec![
            Drone {
                id: 1,
                name: "Heron".to_string(),
                capability: DroneCapability {
                    capacity: 4.0,
                    cooling: true,
                    heating: false,
                    cost_per_move: 0.05,
                    cost_initial: 1.0,
                    cost_final: 1.5,
                    max_moves: 2000,
                },
            },
            Drone {
                id: 2,
                name: "Kestrel".to_string(),
                capability: DroneCapability {
                    capacity: 8.0,
                    cooling: false,
                    heating: true,
                    cost_per_move: 0.1,
                    cost_initial: 2.0,
                    cost_final: 2.0,
                    max_moves: 500,
                },
            },
        ]
    }

    fn clause(attribute: &str, operator: &str, value: &str) -> QueryClause {
        QueryClause {
            attribute: Some(attribute.to_string()),
            operator: Some(operator.to_string()),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn cooling_filter_returns_matching_ids() {
        let drones = fleet();
        assert_eq!(with_cooling(&drones, true), vec![1]);
        assert_eq!(with_cooling(&drones, false), vec![2]);
    }

    #[test]
    fn attribute_equality_is_case_insensitive_on_names() {
        let drones = fleet();
        assert!(matches_attribute(&drones[0], "NAME", "heron"));
        assert!(matches_attribute(&drones[0], "Cooling", "TRUE"));
        assert!(matches_attribute(&drones[1], "capacity", "8.0"));
        assert!(!matches_attribute(&drones[1], "capacity", "8.5"));
        assert!(!matches_attribute(&drones[0], "wingspan", "2"));
        assert!(!matches_attribute(&drones[0], "capacity", "not-a-number"));
    }

    #[test]
    fn operator_clauses_combine_with_and() {
        let drones = fleet();
        let query = vec![clause("capacity", ">", "5"), clause("heating", "=", "true")];
        let ids: Vec<u32> = drones
            .iter()
            .filter(|drone| matches_all(drone, &query))
            .map(|drone| drone.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn ordering_operators_apply_to_numeric_attributes() {
        let drones = fleet();
        assert!(matches_all(&drones[0], &[clause("maxmoves", ">", "1000")]));
        assert!(matches_all(&drones[1], &[clause("maxmoves", "<", "1000")]));
        assert!(matches_all(&drones[0], &[clause("costpermove", "!=", "0.1")]));
        // Ordering operators are meaningless on booleans.
        assert!(!matches_all(&drones[0], &[clause("cooling", "<", "true")]));
    }

    #[test]
    fn incomplete_clauses_match_nothing() {
        let drones = fleet();
        let broken = QueryClause {
            attribute: Some("capacity".to_string()),
            operator: None,
            value: Some("4".to_string()),
        };
        assert!(!matches_all(&drones[0], &[broken]));
        assert!(!matches_all(&drones[0], &[clause("capacity", "~", "4")]));
    }

    fn serving_snapshot() -> FleetSnapshot {
        FleetSnapshot {
            drones: fleet(),
            service_points: vec![ServicePoint {
                id: 10,
                name: "clinic".to_string(),
                location: Position::new(-3.19, 55.94),
            }],
            rosters: vec![ServicePointRoster {
                service_point_id: 10,
                drones: vec![
                    DroneAvailability {
                        id: 1,
                        availability: vec![AvailabilityWindow {
                            day_of_week: "MONDAY".to_string(),
                            from: "08:00".to_string(),
                            until: "18:00".to_string(),
                        }],
                    },
                    DroneAvailability {
                        id: 2,
                        availability: vec![AvailabilityWindow {
                            day_of_week: "FRIDAY".to_string(),
                            from: "08:00".to_string(),
                            until: "18:00".to_string(),
                        }],
                    },
                ],
            }],
            restricted_areas: Vec::new(),
        }
    }

    fn monday_dispatch() -> MedDispatch {
        MedDispatch {
            id: 1,
            date: Some("2025-06-02".to_string()),
            time: Some("10:00".to_string()),
            requirements: Some(DispatchRequirements {
                capacity: 2.0,
                cooling: None,
                heating: None,
                max_cost: None,
            }),
            delivery: Some(Position::new(-3.188, 55.941)),
        }
    }

    #[test]
    fn serving_query_checks_capability_and_schedule() {
        let snapshot = serving_snapshot();
        // Only drone 1 is on the Monday roster.
        assert_eq!(drones_serving_all(&snapshot, &[monday_dispatch()]), vec![1]);

        let mut cold_chain = monday_dispatch();
        if let Some(requirements) = cold_chain.requirements.as_mut() {
            requirements.cooling = Some(true);
        }
        assert_eq!(drones_serving_all(&snapshot, &[cold_chain]), vec![1]);

        let mut heavy = monday_dispatch();
        if let Some(requirements) = heavy.requirements.as_mut() {
            requirements.capacity = 6.0;
        }
        assert!(drones_serving_all(&snapshot, &[heavy]).is_empty());
    }

    #[test]
    fn serving_query_respects_the_cost_ceiling() {
        let snapshot = serving_snapshot();
        let mut capped = monday_dispatch();
        if let Some(requirements) = capped.requirements.as_mut() {
            // Estimate for drone 1 is just over 2.5; a ceiling of 2.0 rules it out.
            requirements.max_cost = Some(2.0);
        }
        assert!(drones_serving_all(&snapshot, &[capped]).is_empty());

        let mut generous = monday_dispatch();
        if let Some(requirements) = generous.requirements.as_mut() {
            requirements.max_cost = Some(100.0);
        }
        assert_eq!(drones_serving_all(&snapshot, &[generous]), vec![1]);
    }

    #[test]
    fn missing_requirements_disqualify_every_drone() {
        let snapshot = serving_snapshot();
        let mut bare = monday_dispatch();
        bare.requirements = None;
        assert!(drones_serving_all(&snapshot, &[bare]).is_empty());
    }
}
