//! Greedy multi-dispatch assignment over the grid pathfinder.
//!
//! For each service point and each drone stationed there, the planner
//! repeatedly commits the pending dispatch that costs the fewest additional
//! moves (ties broken by lower flight cost) until the drone can make no
//! further progress, then flies the drone home. The choice is greedy per
//! drone; committed deliveries are never revisited.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use tracing::{debug, warn};

use crate::models::{
    DeliverySegment, Drone, DroneAvailability, DronePath, MedDispatch, Position, RestrictedArea,
    RouteReport, ServicePoint, ServicePointRoster,
};
use crate::pathfinder;

/// The stationary hover at a delivery point costs one extra move.
const HOVER_MOVES: u32 = 1;

/// Read-only entity snapshots for one planning call. Callers fetch these up
/// front; the planner never performs I/O and never mutates them.
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    pub drones: Vec<Drone>,
    pub service_points: Vec<ServicePoint>,
    pub rosters: Vec<ServicePointRoster>,
    pub restricted_areas: Vec<RestrictedArea>,
}

struct Candidate {
    dispatch_id: u32,
    delivery: Position,
    outbound: Vec<Position>,
    /// Outbound + hover + return; reserved against the drone's move budget
    /// and used for the flight cost.
    reserved_moves: u32,
    flight_cost: f64,
}

/// Plan delivery routes for the given dispatch list.
///
/// Dispatches that cannot be served by any drone are left unrouted; they
/// simply do not appear in the report. Malformed dispatches are skipped, not
/// fatal.
pub fn plan_deliveries(snapshot: &FleetSnapshot, dispatches: &[MedDispatch]) -> RouteReport {
    let drone_by_id: HashMap<u32, &Drone> =
        snapshot.drones.iter().map(|drone| (drone.id, drone)).collect();
    let service_point_by_id: HashMap<u32, &ServicePoint> = snapshot
        .service_points
        .iter()
        .map(|point| (point.id, point))
        .collect();

    // Working set of undelivered dispatches, first-appearance order. A
    // repeated id replaces the earlier record in place.
    let mut pending: Vec<&MedDispatch> = Vec::new();
    for dispatch in dispatches {
        if let Some(slot) = pending.iter_mut().find(|entry| entry.id == dispatch.id) {
            *slot = dispatch;
        } else {
            pending.push(dispatch);
        }
    }

    let mut drone_paths: Vec<DronePath> = Vec::new();
    let mut total_moves: u32 = 0;
    let mut total_cost: f64 = 0.0;

    'service_points: for roster in &snapshot.rosters {
        let Some(service_point) = service_point_by_id.get(&roster.service_point_id).copied() else {
            continue;
        };

        for availability in &roster.drones {
            let Some(drone) = drone_by_id.get(&availability.id).copied() else {
                continue;
            };

            let base = service_point.location;
            let mut current = base;
            let mut moves_used: u32 = 0;
            let mut deliveries: Vec<DeliverySegment> = Vec::new();

            while let Some(chosen) = pick_next_delivery(
                &pending,
                drone,
                availability,
                &current,
                &base,
                &snapshot.restricted_areas,
                moves_used,
            ) {
                let mut flight_path = chosen.outbound;
                if let Some(last) = flight_path.last().copied() {
                    flight_path.push(last); // hover
                }
                let flown_moves = flight_path.len().saturating_sub(1) as u32;

                deliveries.push(DeliverySegment {
                    delivery_id: Some(chosen.dispatch_id),
                    flight_path,
                });
                moves_used += chosen.reserved_moves;
                total_moves += flown_moves;
                total_cost += chosen.flight_cost;
                current = chosen.delivery;
                pending.retain(|dispatch| dispatch.id != chosen.dispatch_id);

                if pending.is_empty() {
                    break;
                }
            }

            if !deliveries.is_empty() {
                if let Some(return_path) = pathfinder::find_path(
                    &current,
                    &base,
                    &snapshot.restricted_areas,
                    drone.capability.max_moves,
                ) {
                    let return_moves = return_path.len().saturating_sub(1) as u32;
                    deliveries.push(DeliverySegment {
                        delivery_id: None,
                        flight_path: return_path,
                    });
                    // The fixed initial/final costs were charged with the
                    // committed deliveries; the return leg only adds moves.
                    total_moves += return_moves;
                }
                drone_paths.push(DronePath {
                    drone_id: drone.id,
                    deliveries,
                });
            }

            if pending.is_empty() {
                break 'service_points;
            }
        }
    }

    RouteReport {
        total_cost,
        total_moves,
        drone_paths,
    }
}

#[allow(clippy::too_many_arguments)]
fn pick_next_delivery(
    pending: &[&MedDispatch],
    drone: &Drone,
    availability: &DroneAvailability,
    current: &Position,
    base: &Position,
    restricted: &[RestrictedArea],
    moves_used: u32,
) -> Option<Candidate> {
    let capability = &drone.capability;
    let mut best: Option<Candidate> = None;

    for dispatch in pending {
        let Some(delivery) = dispatch.delivery else {
            debug!(dispatch = dispatch.id, "dispatch has no delivery coordinate");
            continue;
        };
        let Some(requirements) = dispatch.requirements.as_ref() else {
            warn!(dispatch = dispatch.id, "dispatch has no requirements block");
            continue;
        };

        if requirements.capacity > capability.capacity {
            continue;
        }
        if requirements.cooling == Some(true) && !capability.cooling {
            continue;
        }
        if requirements.heating == Some(true) && !capability.heating {
            continue;
        }
        if !is_available_for(availability, dispatch.date.as_deref(), dispatch.time.as_deref()) {
            continue;
        }

        let Some(outbound) =
            pathfinder::find_path(current, &delivery, restricted, capability.max_moves)
        else {
            debug!(dispatch = dispatch.id, "delivery coordinate is unreachable");
            continue;
        };
        let Some(return_path) =
            pathfinder::find_path(&delivery, base, restricted, capability.max_moves)
        else {
            debug!(dispatch = dispatch.id, "no return path to the service point");
            continue;
        };

        let outbound_moves = outbound.len().saturating_sub(1) as u32;
        let return_moves = return_path.len().saturating_sub(1) as u32;
        let reserved_moves = outbound_moves + HOVER_MOVES + return_moves;
        if moves_used + reserved_moves > capability.max_moves {
            continue;
        }

        let flight_cost = capability.cost_initial
            + capability.cost_final
            + f64::from(reserved_moves) * capability.cost_per_move;
        if requirements
            .max_cost
            .is_some_and(|ceiling| flight_cost > ceiling)
        {
            debug!(
                dispatch = dispatch.id,
                flight_cost, "flight cost exceeds the dispatch ceiling"
            );
            continue;
        }

        let improves = match &best {
            None => true,
            Some(leader) => {
                reserved_moves < leader.reserved_moves
                    || (reserved_moves == leader.reserved_moves
                        && flight_cost < leader.flight_cost)
            }
        };
        if improves {
            best = Some(Candidate {
                dispatch_id: dispatch.id,
                delivery,
                outbound,
                reserved_moves,
                flight_cost,
            });
        }
    }

    best
}

/// True when the drone may fly for a dispatch at the given date/time. A
/// dispatch without a date or time is always in window; an unparseable one
/// never is.
pub fn is_available_for(
    availability: &DroneAvailability,
    date: Option<&str>,
    time: Option<&str>,
) -> bool {
    let (Some(date), Some(time)) = (date, time) else {
        return true;
    };
    let Ok(date) = date.parse::<NaiveDate>() else {
        return false;
    };
    let Some(time) = parse_time(time) else {
        return false;
    };

    let weekday = weekday_name(date.weekday());
    availability.availability.iter().any(|window| {
        window.day_of_week.eq_ignore_ascii_case(weekday)
            && parse_time(&window.from).is_some_and(|from| time >= from)
            && parse_time(&window.until).is_some_and(|until| time <= until)
    })
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}
