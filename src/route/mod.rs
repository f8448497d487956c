//! Route geometry, stop registry, and route-relative position logic

pub mod geometry;
pub mod stops;
pub mod direction;
pub mod status;

pub use direction::advance;
pub use geometry::{haversine_distance, RouteGeometry, RouteSnap};
pub use status::{resolve, ResolverConfig, StopResolution};
pub use stops::{IndexedStop, StopRegistry};
