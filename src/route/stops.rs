//! Stop registry with pre-computed route indices
//!
//! Each stop's nearest route vertex is resolved once at construction so the
//! poll path only ever re-snaps the bus itself, never the stops.

use crate::core::Stop;
use crate::route::geometry::RouteGeometry;

/// Stop plus the route index it was snapped to at construction
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedStop {
    pub stop: Stop,
    pub route_index: usize,
}

/// Ordered, immutable set of stops for one route.
///
/// Stops are sorted by sequence number; iteration order is sequence order.
#[derive(Debug, Clone)]
pub struct StopRegistry {
    stops: Vec<IndexedStop>,
}

impl StopRegistry {
    /// Build the registry, snapping every stop onto the route.
    ///
    /// Returns `None` when either the stop list or the route polyline is
    /// empty; a registry cannot exist without both.
    pub fn build(mut stops: Vec<Stop>, route: &RouteGeometry) -> Option<Self> {
        if stops.is_empty() || route.is_empty() {
            return None;
        }

        stops.sort_by_key(|stop| stop.sequence);

        let mut indexed = Vec::with_capacity(stops.len());
        for stop in stops {
            let snap = route.snap(stop.position)?;
            indexed.push(IndexedStop {
                stop,
                route_index: snap.index,
            });
        }

        Some(Self { stops: indexed })
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedStop> {
        self.stops.iter()
    }

    pub fn stops(&self) -> &[IndexedStop] {
        &self.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoPoint;

    fn test_route() -> RouteGeometry {
        RouteGeometry::new(vec![
            GeoPoint::new(12.90, 77.50),
            GeoPoint::new(12.91, 77.51),
            GeoPoint::new(12.92, 77.52),
            GeoPoint::new(12.93, 77.53),
        ])
    }

    fn stop(id: u32, name: &str, lat: f64, lon: f64, sequence: u32) -> Stop {
        Stop {
            id: id.to_string(),
            name: name.to_string(),
            position: GeoPoint::new(lat, lon),
            sequence,
        }
    }

    #[test]
    fn test_build_sorts_by_sequence() {
        let stops = vec![
            stop(2, "Second", 12.92, 77.52, 2),
            stop(1, "First", 12.90, 77.50, 1),
        ];

        let registry = StopRegistry::build(stops, &test_route()).unwrap();
        let names: Vec<&str> = registry.iter().map(|s| s.stop.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_build_precomputes_route_indices() {
        let stops = vec![
            stop(1, "First", 12.9001, 77.5001, 1),
            stop(2, "Second", 12.9299, 77.5299, 2),
        ];

        let registry = StopRegistry::build(stops, &test_route()).unwrap();
        assert_eq!(registry.stops()[0].route_index, 0);
        assert_eq!(registry.stops()[1].route_index, 3);
    }

    #[test]
    fn test_build_rejects_empty_stops() {
        assert!(StopRegistry::build(Vec::new(), &test_route()).is_none());
    }

    #[test]
    fn test_build_rejects_empty_route() {
        let stops = vec![stop(1, "First", 12.90, 77.50, 1)];
        let empty = RouteGeometry::new(Vec::new());
        assert!(StopRegistry::build(stops, &empty).is_none());
    }
}
