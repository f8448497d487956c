//! Poll-cycle engine combining radio, tower store, and route model

use crate::api::types::{ApiError, ApiResult, PositionReport, SessionStats};
use crate::core::{operator_label, GeoPoint, Stop, TrackerState, TravelDirection};
use crate::radio::{validate_reading, CellReader};
use crate::route::{self, RouteGeometry, StopRegistry};
use crate::store::TowerStore;
use crate::utils::TrackerConfig;

/// Offline position estimator for one bus on one route.
///
/// Owns every resource a tracking session needs: the modem reader, the
/// tower database, the immutable route model, and the direction state
/// that carries between polls. Each `poll` runs one full estimation
/// cycle; on any gap in the chain it reports `Unresolved` and leaves
/// the session ready for the next cycle.
pub struct PositionEstimator {
    reader: Box<dyn CellReader + Send>,
    store: TowerStore,
    route: RouteGeometry,
    stops: StopRegistry,
    config: TrackerConfig,
    state: TrackerState,
    stats: SessionStats,
}

impl PositionEstimator {
    /// Create an estimator over a loaded route model.
    ///
    /// Fails up front on anything that would make every later poll
    /// meaningless: an invalid configuration, an empty polyline, or an
    /// empty stop list.
    pub fn new(
        reader: Box<dyn CellReader + Send>,
        store: TowerStore,
        route_points: Vec<GeoPoint>,
        stops: Vec<Stop>,
        config: TrackerConfig,
    ) -> ApiResult<Self> {
        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error.into());
        }

        let route = RouteGeometry::new(route_points);
        if route.is_empty() {
            return Err(ApiError::EmptyRoute);
        }

        let stops = match StopRegistry::build(stops, &route) {
            Some(registry) => registry,
            None => return Err(ApiError::EmptyStops),
        };

        Ok(Self {
            reader,
            store,
            route,
            stops,
            config,
            state: TrackerState::default(),
            stats: SessionStats::default(),
        })
    }

    /// Run one estimation cycle.
    ///
    /// Never fails: every failure mode (modem error, no registered
    /// cell, unusable identity, unknown tower, database error) degrades
    /// to `Unresolved` after logging. Direction state only advances on
    /// cycles that reach the route snap, so a string of misses cannot
    /// corrupt it.
    pub fn poll(&mut self) -> PositionReport {
        self.stats.polls_completed += 1;

        let reading = match self.reader.current_cell() {
            Ok(Some(reading)) => reading,
            Ok(None) => {
                log::debug!("No registered cell this cycle");
                return PositionReport::Unresolved;
            }
            Err(error) => {
                self.stats.radio_errors += 1;
                log::warn!(
                    "Modem read failed: {} (recovery: {:?})",
                    error,
                    error.recovery_strategy()
                );
                return PositionReport::Unresolved;
            }
        };

        if let Err(error) = validate_reading(&reading) {
            log::debug!("Dropping unusable reading: {}", error);
            return PositionReport::Unresolved;
        }

        let tower = match self
            .store
            .find_tower(reading.mcc, reading.mnc, reading.lac, reading.cid)
        {
            Ok(Some(tower)) => tower,
            Ok(None) => {
                self.stats.lookup_misses += 1;
                log::info!(
                    "Tower {}-{}-{}-{} not in database",
                    reading.mcc,
                    reading.mnc,
                    reading.lac,
                    reading.cid
                );
                return PositionReport::Unresolved;
            }
            Err(error) => {
                log::error!("Tower lookup failed: {}", error);
                return PositionReport::Unresolved;
            }
        };

        let snap = match self.route.snap(tower.position) {
            Some(snap) => snap,
            None => return PositionReport::Unresolved,
        };

        self.state = route::advance(self.state, snap.index, self.config.direction_hysteresis);

        let resolution = match route::resolve(
            snap.point,
            snap.index,
            &self.stops,
            self.state.direction,
            &self.config.resolver_config(),
        ) {
            Some(resolution) => resolution,
            None => return PositionReport::Unresolved,
        };

        self.stats.reports_resolved += 1;
        PositionReport::Resolved {
            estimated_position: snap.point,
            stop: resolution.stop.stop.clone(),
            distance_to_stop_m: resolution.distance_m,
            status: resolution.status,
            reading,
            network_label: operator_label(reading.mnc),
        }
    }

    /// Replace the configuration mid-session.
    ///
    /// The new configuration must validate; direction state and
    /// statistics carry over unchanged.
    pub fn update_config(&mut self, config: TrackerConfig) -> ApiResult<()> {
        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error.into());
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Direction the tracker currently believes the bus is moving
    pub fn direction(&self) -> TravelDirection {
        self.state.direction
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Tower database backing this session
    pub fn store(&self) -> &TowerStore {
        &self.store
    }

    /// Number of vertices in the loaded route polyline
    pub fn route_len(&self) -> usize {
        self.route.len()
    }

    /// Number of stops in the loaded registry
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellReading, RadioType, StopStatus, TowerRecord};
    use crate::radio::MockCellReader;

    // About 30 m of longitude per step on the equator
    const LON_STEP: f64 = 0.00027;

    fn vertex(index: usize) -> GeoPoint {
        GeoPoint::new(0.0, index as f64 * LON_STEP)
    }

    fn route_points(len: usize) -> Vec<GeoPoint> {
        (0..len).map(vertex).collect()
    }

    fn stop_at(id: u32, name: &str, index: usize, sequence: u32) -> Stop {
        Stop {
            id: id.to_string(),
            name: name.to_string(),
            position: vertex(index),
            sequence,
        }
    }

    fn tower_at(cid: u64, index: usize) -> TowerRecord {
        TowerRecord {
            mcc: 404,
            mnc: 45,
            lac: 1801,
            cid,
            position: vertex(index),
        }
    }

    fn reading(cid: u64) -> CellReading {
        CellReading::new(404, 45, 1801, cid, RadioType::Lte)
    }

    fn build_estimator(towers: &[TowerRecord], reader: MockCellReader) -> PositionEstimator {
        let mut store = TowerStore::in_memory().unwrap();
        store.import(towers).unwrap();

        let stops = vec![
            stop_at(1, "Depot", 0, 1),
            stop_at(2, "Market", 10, 2),
            stop_at(3, "College", 19, 3),
        ];

        PositionEstimator::new(
            Box::new(reader),
            store,
            route_points(20),
            stops,
            TrackerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_route_rejected() {
        let reader = MockCellReader::new();
        let store = TowerStore::in_memory().unwrap();
        let result = PositionEstimator::new(
            Box::new(reader),
            store,
            Vec::new(),
            vec![stop_at(1, "Depot", 0, 1)],
            TrackerConfig::default(),
        );
        assert_eq!(result.err(), Some(ApiError::EmptyRoute));
    }

    #[test]
    fn test_empty_stops_rejected() {
        let reader = MockCellReader::new();
        let store = TowerStore::in_memory().unwrap();
        let result = PositionEstimator::new(
            Box::new(reader),
            store,
            route_points(5),
            Vec::new(),
            TrackerConfig::default(),
        );
        assert_eq!(result.err(), Some(ApiError::EmptyStops));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let reader = MockCellReader::new();
        let store = TowerStore::in_memory().unwrap();
        let config = TrackerConfig {
            poll_interval_ms: 0,
            ..TrackerConfig::default()
        };
        let result = PositionEstimator::new(
            Box::new(reader),
            store,
            route_points(5),
            vec![stop_at(1, "Depot", 0, 1)],
            config,
        );
        match result.err() {
            Some(ApiError::ConfigurationError { parameter, .. }) => {
                assert_eq!(parameter, "poll_interval_ms");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_signal_reports_unresolved() {
        let mut reader = MockCellReader::new();
        reader.push_no_service();
        let mut estimator = build_estimator(&[], reader);

        assert_eq!(estimator.poll(), PositionReport::Unresolved);
        let stats = estimator.stats();
        assert_eq!(stats.polls_completed, 1);
        assert_eq!(stats.reports_resolved, 0);
    }

    #[test]
    fn test_unknown_tower_reports_unresolved() {
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(999));
        let mut estimator = build_estimator(&[tower_at(1, 0)], reader);

        assert_eq!(estimator.poll(), PositionReport::Unresolved);
        assert_eq!(estimator.stats().lookup_misses, 1);
    }

    #[test]
    fn test_modem_error_reports_unresolved() {
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(1));
        reader.disconnect();
        let mut estimator = build_estimator(&[tower_at(1, 0)], reader);

        assert_eq!(estimator.poll(), PositionReport::Unresolved);
        assert_eq!(estimator.stats().radio_errors, 1);
    }

    #[test]
    fn test_unusable_identity_dropped() {
        let mut reader = MockCellReader::new();
        // lac 0 is a placeholder the modem reports while searching
        reader.push_cell(404, 45, 0, 7_431_902);
        let mut estimator = build_estimator(&[], reader);

        assert_eq!(estimator.poll(), PositionReport::Unresolved);
        assert_eq!(estimator.stats().lookup_misses, 0);
    }

    #[test]
    fn test_known_tower_resolves_at_stop() {
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(7));
        let mut estimator = build_estimator(&[tower_at(7, 10)], reader);

        assert_eq!(estimator.route_len(), 20);
        assert_eq!(estimator.stop_count(), 3);
        assert_eq!(estimator.store().count().unwrap(), 1);

        match estimator.poll() {
            PositionReport::Resolved {
                estimated_position,
                stop,
                distance_to_stop_m,
                status,
                network_label,
                ..
            } => {
                assert_eq!(estimated_position, vertex(10));
                assert_eq!(stop.name, "Market");
                assert!(distance_to_stop_m < 1.0);
                assert_eq!(status, StopStatus::AtStop);
                assert_eq!(network_label, "Airtel");
            }
            PositionReport::Unresolved => panic!("expected a resolved report"),
        }
        assert_eq!(estimator.stats().reports_resolved, 1);
    }

    #[test]
    fn test_miss_does_not_advance_direction_state() {
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(7));
        reader.push_no_service();
        let mut estimator = build_estimator(&[tower_at(7, 10)], reader);

        estimator.poll();
        let before = estimator.state();
        estimator.poll();
        assert_eq!(estimator.state(), before);
    }

    #[test]
    fn test_sustained_backward_motion_flips_direction() {
        let towers = [tower_at(1, 15), tower_at(2, 10), tower_at(3, 5)];
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(1));
        reader.push_reading(reading(2));
        reader.push_reading(reading(3));
        let mut estimator = build_estimator(&towers, reader);

        estimator.poll();
        assert_eq!(estimator.direction(), TravelDirection::Forward);
        estimator.poll();
        assert_eq!(estimator.direction(), TravelDirection::Backward);
        estimator.poll();
        assert_eq!(estimator.direction(), TravelDirection::Backward);
    }

    #[test]
    fn test_departed_stop_retargets_upcoming() {
        // Index 14 is about 120 m past Market, outside the at-stop radius
        let towers = [tower_at(1, 10), tower_at(2, 14)];
        let mut reader = MockCellReader::new();
        reader.push_reading(reading(1));
        reader.push_reading(reading(2));
        let mut estimator = build_estimator(&towers, reader);

        estimator.poll();
        match estimator.poll() {
            PositionReport::Resolved { stop, status, .. } => {
                assert_eq!(stop.name, "College");
                assert_eq!(status, StopStatus::Approaching);
            }
            PositionReport::Unresolved => panic!("expected a resolved report"),
        }
    }

    #[test]
    fn test_update_config_validates() {
        let reader = MockCellReader::new();
        let mut estimator = build_estimator(&[], reader);

        let bad = TrackerConfig {
            at_stop_radius_m: -5.0,
            ..TrackerConfig::default()
        };
        assert!(estimator.update_config(bad).is_err());

        let good = TrackerConfig {
            at_stop_radius_m: 150.0,
            ..TrackerConfig::default()
        };
        assert!(estimator.update_config(good).is_ok());
        assert_eq!(estimator.config().at_stop_radius_m, 150.0);
    }
}
