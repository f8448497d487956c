//! Static geometry and tower data loading
//!
//! Parses the bundled route polyline, stop list and tower survey files.
//! Load failures degrade to empty collections rather than errors; callers
//! treat empty route or stop data as "no tracking possible".

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::core::{GeoPoint, Stop, TowerRecord};

/// Load the route polyline from a GeoJSON file.
///
/// The route is the first feature's LineString. Coordinates are stored
/// `[lon, lat]` on disk.
pub fn load_route_polyline(path: &Path) -> Vec<GeoPoint> {
    match fs::read_to_string(path) {
        Ok(json) => parse_route(&json),
        Err(err) => {
            log::error!("Failed to read route file {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// Load the stop list from a JSON file, accepting either format
/// recognized by [`parse_stops`].
pub fn load_stops(path: &Path) -> Vec<Stop> {
    match fs::read_to_string(path) {
        Ok(json) => parse_stops(&json),
        Err(err) => {
            log::error!("Failed to read stop file {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// Load a tower survey from a GeoJSON file.
pub fn load_towers(path: &Path) -> Vec<TowerRecord> {
    match fs::read_to_string(path) {
        Ok(json) => parse_towers(&json),
        Err(err) => {
            log::error!("Failed to read tower file {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// Parse a route polyline from GeoJSON text.
///
/// Any malformed coordinate discards the whole route; a partial polyline
/// would shift every route index.
pub fn parse_route(json: &str) -> Vec<GeoPoint> {
    let root: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to parse route geometry: {}", err);
            return Vec::new();
        }
    };

    let coordinates = root
        .get("features")
        .and_then(|features| features.get(0))
        .and_then(|feature| feature.get("geometry"))
        .and_then(|geometry| geometry.get("coordinates"))
        .and_then(Value::as_array);

    let Some(coordinates) = coordinates else {
        log::error!("Route file has no feature with coordinates");
        return Vec::new();
    };

    let points: Option<Vec<GeoPoint>> = coordinates.iter().map(coordinate_pair).collect();
    match points {
        Some(points) => points,
        None => {
            log::error!("Route geometry has malformed coordinates");
            Vec::new()
        }
    }
}

/// Parse a stop list from JSON text.
///
/// Two shapes are recognized: a GeoJSON FeatureCollection of Point
/// features (properties `name`, optional `id` and `sequence`), or a
/// custom `{"stops": [...]}` document where each entry carries `id`,
/// `name`, `location` as `[lon, lat]` and `sequence`.
pub fn parse_stops(json: &str) -> Vec<Stop> {
    let root: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to parse stop data: {}", err);
            return Vec::new();
        }
    };

    if root.get("features").is_some() {
        parse_geojson_stops(&root)
    } else if root.get("stops").is_some() {
        parse_custom_stops(&root)
    } else {
        log::error!("Unrecognized stop file format");
        Vec::new()
    }
}

fn parse_geojson_stops(root: &Value) -> Vec<Stop> {
    let Some(features) = root.get("features").and_then(Value::as_array) else {
        log::error!("Stop file features entry is not an array");
        return Vec::new();
    };

    let mut stops = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let properties = feature.get("properties");
        let name = properties
            .and_then(|props| props.get("name"))
            .and_then(Value::as_str);
        let position = feature
            .get("geometry")
            .and_then(|geometry| geometry.get("coordinates"))
            .and_then(coordinate_pair);

        match (name, position) {
            (Some(name), Some(position)) => {
                let id = properties
                    .and_then(|props| props.get("id"))
                    .and_then(string_or_number)
                    .unwrap_or_else(|| i.to_string());
                let sequence = properties
                    .and_then(|props| props.get("sequence"))
                    .and_then(Value::as_u64)
                    .unwrap_or(i as u64 + 1) as u32;
                stops.push(Stop {
                    id,
                    name: name.to_string(),
                    position,
                    sequence,
                });
            }
            _ => {
                log::error!("Stop feature {} is malformed, discarding stop data", i);
                return Vec::new();
            }
        }
    }
    stops
}

fn parse_custom_stops(root: &Value) -> Vec<Stop> {
    let Some(entries) = root.get("stops").and_then(Value::as_array) else {
        log::error!("Stop file stops entry is not an array");
        return Vec::new();
    };

    let mut stops = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let id = entry.get("id").and_then(string_or_number);
        let name = entry.get("name").and_then(Value::as_str);
        let position = entry.get("location").and_then(coordinate_pair);
        let sequence = entry.get("sequence").and_then(Value::as_u64);

        match (id, name, position, sequence) {
            (Some(id), Some(name), Some(position), Some(sequence)) => stops.push(Stop {
                id,
                name: name.to_string(),
                position,
                sequence: sequence as u32,
            }),
            _ => {
                log::error!("Stop entry {} is malformed, discarding stop data", i);
                return Vec::new();
            }
        }
    }
    stops
}

/// Parse a tower survey from GeoJSON text.
///
/// Each feature carries the identity tuple in its properties and the
/// surveyed position as a Point. Malformed features are skipped so one
/// bad record cannot block a bulk import.
pub fn parse_towers(json: &str) -> Vec<TowerRecord> {
    let root: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to parse tower data: {}", err);
            return Vec::new();
        }
    };

    let Some(features) = root.get("features").and_then(Value::as_array) else {
        log::error!("Tower file has no features array");
        return Vec::new();
    };

    let mut towers = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        match tower_from_feature(feature) {
            Some(tower) => towers.push(tower),
            None => log::warn!("Skipping malformed tower feature {}", i),
        }
    }
    towers
}

fn tower_from_feature(feature: &Value) -> Option<TowerRecord> {
    let properties = feature.get("properties")?;
    let mcc = u16::try_from(properties.get("mcc")?.as_u64()?).ok()?;
    let mnc = u16::try_from(properties.get("mnc")?.as_u64()?).ok()?;
    let lac = u32::try_from(properties.get("lac")?.as_u64()?).ok()?;
    let cid = properties.get("cid")?.as_u64()?;
    let position = feature
        .get("geometry")?
        .get("coordinates")
        .and_then(coordinate_pair)?;

    Some(TowerRecord {
        mcc,
        mnc,
        lac,
        cid,
        position,
    })
}

/// Read a `[lon, lat]` coordinate pair.
fn coordinate_pair(value: &Value) -> Option<GeoPoint> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    Some(GeoPoint::new(lat, lon))
}

fn string_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_JSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[77.50, 12.90], [77.51, 12.91], [77.52, 12.92]]
            }
        }]
    }"#;

    #[test]
    fn test_route_coordinates_are_lon_lat_on_disk() {
        let route = parse_route(ROUTE_JSON);
        assert_eq!(route.len(), 3);
        assert_eq!(route[0], GeoPoint::new(12.90, 77.50));
        assert_eq!(route[2], GeoPoint::new(12.92, 77.52));
    }

    #[test]
    fn test_route_load_is_idempotent() {
        assert_eq!(parse_route(ROUTE_JSON), parse_route(ROUTE_JSON));
    }

    #[test]
    fn test_malformed_route_degrades_to_empty() {
        assert!(parse_route("not json").is_empty());
        assert!(parse_route(r#"{"type": "FeatureCollection"}"#).is_empty());
    }

    #[test]
    fn test_route_with_bad_coordinate_degrades_to_empty() {
        let json = r#"{
            "features": [{
                "geometry": {"coordinates": [[77.50, 12.90], ["x", 12.91]]}
            }]
        }"#;
        assert!(parse_route(json).is_empty());
    }

    #[test]
    fn test_geojson_stops_with_defaults() {
        let json = r#"{
            "features": [
                {
                    "properties": {"name": "Majestic"},
                    "geometry": {"coordinates": [77.5713, 12.9767]}
                },
                {
                    "properties": {"name": "Market", "id": "mkt", "sequence": 5},
                    "geometry": {"coordinates": [77.5750, 12.9650]}
                }
            ]
        }"#;
        let stops = parse_stops(json);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id, "0");
        assert_eq!(stops[0].sequence, 1);
        assert_eq!(stops[0].position, GeoPoint::new(12.9767, 77.5713));
        assert_eq!(stops[1].id, "mkt");
        assert_eq!(stops[1].sequence, 5);
    }

    #[test]
    fn test_custom_stops_format() {
        let json = r#"{
            "stops": [
                {"id": 1, "name": "Depot", "location": [77.50, 12.90], "sequence": 1},
                {"id": "term", "name": "Terminal", "location": [77.52, 12.92], "sequence": 2}
            ]
        }"#;
        let stops = parse_stops(json);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id, "1");
        assert_eq!(stops[0].position, GeoPoint::new(12.90, 77.50));
        assert_eq!(stops[1].id, "term");
    }

    #[test]
    fn test_stop_missing_name_discards_all() {
        let json = r#"{
            "features": [
                {
                    "properties": {"name": "Majestic"},
                    "geometry": {"coordinates": [77.5713, 12.9767]}
                },
                {
                    "properties": {},
                    "geometry": {"coordinates": [77.5750, 12.9650]}
                }
            ]
        }"#;
        assert!(parse_stops(json).is_empty());
    }

    #[test]
    fn test_unrecognized_stop_format_is_empty() {
        assert!(parse_stops(r#"{"routes": []}"#).is_empty());
    }

    #[test]
    fn test_tower_parse_skips_malformed_features() {
        let json = r#"{
            "features": [
                {
                    "properties": {"mcc": 404, "mnc": 86, "lac": 11000, "cid": 5001},
                    "geometry": {"coordinates": [77.5946, 12.9716]}
                },
                {
                    "properties": {"mcc": 404, "mnc": 86},
                    "geometry": {"coordinates": [77.60, 12.98]}
                },
                {
                    "properties": {"mcc": 404, "mnc": 86, "lac": 11001, "cid": 5002},
                    "geometry": {"coordinates": [77.6000, 12.9800]}
                }
            ]
        }"#;
        let towers = parse_towers(json);
        assert_eq!(towers.len(), 2);
        assert_eq!(towers[0].cid, 5001);
        assert_eq!(towers[0].position, GeoPoint::new(12.9716, 77.5946));
        assert_eq!(towers[1].cid, 5002);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let missing = Path::new("/nonexistent/route.geojson");
        assert!(load_route_polyline(missing).is_empty());
        assert!(load_stops(missing).is_empty());
        assert!(load_towers(missing).is_empty());
    }
}
