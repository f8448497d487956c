//! Stop status classification and next-stop re-targeting

use crate::core::{GeoPoint, StopStatus, TravelDirection};
use crate::route::geometry::haversine_distance;
use crate::route::stops::{IndexedStop, StopRegistry};

/// Distance thresholds for status classification (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// Inside this radius the bus is at the stop no matter what the
    /// index comparison says
    pub at_stop_radius_m: f64,
    /// At-stop radius applied only when bus and stop share a route index
    pub equal_index_radius_m: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            at_stop_radius_m: 100.0,
            equal_index_radius_m: 200.0,
        }
    }
}

/// Outcome of resolving the bus position against the stop registry
#[derive(Debug, Clone, PartialEq)]
pub struct StopResolution<'a> {
    pub stop: &'a IndexedStop,
    pub distance_m: f64,
    pub status: StopStatus,
}

/// Classify the bus's relationship to the nearest (or next upcoming) stop.
///
/// The nearest stop is found by straight-line distance over all stops;
/// status then comes from comparing the bus's route index against the
/// stop's pre-computed one, with the comparison sign flipped for backward
/// travel. A DEPARTED result re-targets to the next stop in the direction
/// of travel so riders see the upcoming stop rather than the one just
/// passed; at the end of the route the DEPARTED result stands.
///
/// Returns `None` only for an empty registry, which the estimator's start
/// guard rules out.
pub fn resolve<'a>(
    position: GeoPoint,
    current_index: usize,
    registry: &'a StopRegistry,
    direction: TravelDirection,
    config: &ResolverConfig,
) -> Option<StopResolution<'a>> {
    let nearest = nearest_stop(position, registry)?;
    let distance = haversine_distance(position, nearest.stop.position);

    let status = if distance < config.at_stop_radius_m {
        StopStatus::AtStop
    } else {
        classify_by_index(current_index, nearest.route_index, distance, direction, config)
    };

    if status == StopStatus::Departed {
        if let Some(upcoming) = next_upcoming_stop(registry, current_index, direction) {
            return Some(StopResolution {
                stop: upcoming,
                distance_m: haversine_distance(position, upcoming.stop.position),
                status: StopStatus::Approaching,
            });
        }
    }

    Some(StopResolution {
        stop: nearest,
        distance_m: distance,
        status,
    })
}

fn classify_by_index(
    current_index: usize,
    stop_index: usize,
    distance: f64,
    direction: TravelDirection,
    config: &ResolverConfig,
) -> StopStatus {
    use std::cmp::Ordering;

    let ordering = current_index.cmp(&stop_index);
    match (direction, ordering) {
        (TravelDirection::Forward, Ordering::Less) => StopStatus::Approaching,
        (TravelDirection::Forward, Ordering::Greater) => StopStatus::Departed,
        (TravelDirection::Backward, Ordering::Greater) => StopStatus::Approaching,
        (TravelDirection::Backward, Ordering::Less) => StopStatus::Departed,
        (_, Ordering::Equal) => {
            if distance < config.equal_index_radius_m {
                StopStatus::AtStop
            } else {
                StopStatus::Approaching
            }
        }
    }
}

/// Geographically nearest stop, first occurrence winning ties
fn nearest_stop(position: GeoPoint, registry: &StopRegistry) -> Option<&IndexedStop> {
    let mut best: Option<&IndexedStop> = None;
    let mut best_distance = f64::MAX;

    for candidate in registry.iter() {
        let distance = haversine_distance(position, candidate.stop.position);
        if distance < best_distance {
            best_distance = distance;
            best = Some(candidate);
        }
    }

    best
}

/// Next stop strictly ahead of `current_index` in the direction of travel.
///
/// Forward picks the smallest index above current, backward the largest
/// below; strict comparisons keep the first candidate on equal indices.
fn next_upcoming_stop(
    registry: &StopRegistry,
    current_index: usize,
    direction: TravelDirection,
) -> Option<&IndexedStop> {
    let mut best: Option<&IndexedStop> = None;

    for candidate in registry.iter() {
        let ahead = match direction {
            TravelDirection::Forward => candidate.route_index > current_index,
            TravelDirection::Backward => candidate.route_index < current_index,
        };
        if !ahead {
            continue;
        }

        let closer = match best {
            None => true,
            Some(current_best) => match direction {
                TravelDirection::Forward => candidate.route_index < current_best.route_index,
                TravelDirection::Backward => candidate.route_index > current_best.route_index,
            },
        };
        if closer {
            best = Some(candidate);
        }
    }

    best
}
