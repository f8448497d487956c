//! Route polyline geometry and the nearest-vertex snap

use crate::core::{GeoPoint, EARTH_RADIUS_M};

/// Result of snapping a coordinate onto the route polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSnap {
    /// Polyline vertex the input was snapped to
    pub point: GeoPoint,
    /// Index of that vertex within the polyline
    pub index: usize,
}

/// Ordered route polyline, loaded once and immutable for the session.
///
/// Vertex indices form the 1-D coordinate space every ahead/behind
/// comparison in the tracker operates in.
#[derive(Debug, Clone)]
pub struct RouteGeometry {
    points: Vec<GeoPoint>,
}

impl RouteGeometry {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Snap an arbitrary coordinate to the nearest polyline vertex.
    ///
    /// Exhaustive linear scan; on equal distances the lower index wins
    /// because only a strictly smaller distance replaces the best match.
    /// Returns `None` only for an empty polyline.
    pub fn snap(&self, point: GeoPoint) -> Option<RouteSnap> {
        let mut best: Option<RouteSnap> = None;
        let mut best_distance = f64::MAX;

        for (index, vertex) in self.points.iter().enumerate() {
            let distance = haversine_distance(point, *vertex);
            if distance < best_distance {
                best_distance = distance;
                best = Some(RouteSnap {
                    point: *vertex,
                    index,
                });
            }
        }

        best
    }
}

/// Great-circle distance between two coordinates in meters
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}
