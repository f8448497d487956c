//! Static data file parsing

pub mod geojson;

pub use geojson::{
    load_route_polyline, load_stops, load_towers, parse_route, parse_stops, parse_towers,
};
