//! A* search over the implicit 16-direction grid.
//!
//! Nodes are coordinates reached by whole grid steps from the start; edge
//! cost is one move per step. Node identity uses a fixed-precision key so
//! that floating-point neighbours which coincide after rounding collapse to
//! one search node.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::geometry::{self, COMPASS_HEADINGS, STEP_SIZE};
use crate::models::{Position, RestrictedArea};

/// Hard ceiling on node expansions per search.
const MAX_EXPANSIONS: usize = 50_000;

/// Below this distance the terminal grid node is considered to sit on the
/// goal and is replaced by the exact goal coordinate instead of gaining an
/// extra sub-step point.
const GOAL_SNAP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry. Ordering is `f`, then `g`, then insertion sequence, so
/// ties pop in a reproducible order regardless of heap internals.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f_score: FloatOrd,
    g_score: u32,
    seq: u64,
    pos: Position,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.g_score == other.g_score && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Fixed 10-decimal key; search-graph identity must never use raw float
/// equality.
fn node_key(pos: &Position) -> String {
    format!("{:.10},{:.10}", pos.lat, pos.lng)
}

fn inside_restricted(pos: &Position, restricted: &[RestrictedArea]) -> bool {
    // Ill-formed rings are skipped rather than treated as blocking.
    restricted
        .iter()
        .any(|area| geometry::point_in_polygon(pos, &area.vertices).unwrap_or(false))
}

/// Find a path from `start` to `goal` avoiding restricted polygons.
///
/// Returns the coordinate sequence ending exactly on `goal`, or `None` when
/// the frontier or the expansion cap is exhausted first. An unreachable goal
/// is a normal outcome, not an error. `max_moves` only scales the expansion
/// cap; the caller enforces its own move budget on the result.
pub fn find_path(
    start: &Position,
    goal: &Position,
    restricted: &[RestrictedArea],
    max_moves: u32,
) -> Option<Vec<Position>> {
    if geometry::distance(start, goal) <= STEP_SIZE / 2.0 {
        return Some(vec![*start]);
    }

    let expansion_cap = if max_moves > 0 {
        (max_moves as usize * 5).min(MAX_EXPANSIONS)
    } else {
        MAX_EXPANSIONS
    };

    let mut open: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut g_score: HashMap<String, u32> = HashMap::new();
    let mut came_from: HashMap<String, Position> = HashMap::new();
    let mut seq = 0u64;

    let start_key = node_key(start);
    g_score.insert(start_key.clone(), 0);
    open.push(Reverse(OpenNode {
        f_score: FloatOrd(geometry::distance(start, goal) / STEP_SIZE),
        g_score: 0,
        seq,
        pos: *start,
    }));

    let mut expansions = 0usize;
    while let Some(Reverse(current)) = open.pop() {
        expansions += 1;
        if expansions > expansion_cap {
            return None;
        }

        let current_key = node_key(&current.pos);
        let best_g = g_score.get(&current_key).copied().unwrap_or(u32::MAX);
        if current.g_score > best_g {
            continue; // stale frontier entry
        }

        if geometry::distance(&current.pos, goal) <= STEP_SIZE / 2.0 {
            return Some(reconstruct(&came_from, &start_key, &current.pos, goal));
        }

        for angle in COMPASS_HEADINGS {
            let Ok(neighbor) = geometry::step(&current.pos, angle) else {
                continue;
            };
            if inside_restricted(&neighbor, restricted) {
                continue;
            }

            let tentative_g = current.g_score + 1;
            let neighbor_key = node_key(&neighbor);
            if tentative_g < g_score.get(&neighbor_key).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbor_key.clone(), current.pos);
                g_score.insert(neighbor_key, tentative_g);
                let h = geometry::distance(&neighbor, goal) / STEP_SIZE;
                seq += 1;
                open.push(Reverse(OpenNode {
                    f_score: FloatOrd(tentative_g as f64 + h),
                    g_score: tentative_g,
                    seq,
                    pos: neighbor,
                }));
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &HashMap<String, Position>,
    start_key: &str,
    terminal: &Position,
    goal: &Position,
) -> Vec<Position> {
    let mut path = vec![*terminal];
    let mut key = node_key(terminal);
    while key != start_key {
        let Some(parent) = came_from.get(&key) else {
            break;
        };
        path.push(*parent);
        key = node_key(parent);
    }
    path.reverse();

    // Land exactly on the requested coordinate rather than the grid-quantized
    // terminal node.
    if geometry::distance(terminal, goal) <= GOAL_SNAP_EPSILON {
        if let Some(last) = path.last_mut() {
            *last = *goal;
        }
    } else {
        path.push(*goal);
    }
    path
}
