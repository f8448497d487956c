//! Demo binary: replay a scripted drive along a route and print reports
//!
//! Expects `route.geojson`, `stops.geojson` and `towers.geojson` under a
//! data directory (default `data/`). The known towers are replayed
//! through a mock modem in file order, with signal gaps mixed in, so the
//! whole estimation pipeline runs exactly as it would on real hardware.

use std::env;
use std::path::Path;
use std::process;
use std::thread;
use std::time::Duration;

use celltrack::{
    load_route_polyline, load_stops, load_towers, MockCellReader, PositionEstimator,
    TextFormatter, TowerStore, TrackerConfig, TrackingService,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run() {
        log::error!("{}", error);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = env::args().nth(1).unwrap_or_else(|| String::from("data"));
    let data_dir = Path::new(&data_dir);

    let route = load_route_polyline(&data_dir.join("route.geojson"));
    let stops = load_stops(&data_dir.join("stops.geojson"));
    let towers = load_towers(&data_dir.join("towers.geojson"));

    if route.is_empty() || stops.is_empty() {
        eprintln!("usage: celltrack [data-dir]");
        eprintln!("  expects route.geojson, stops.geojson and towers.geojson under the data dir");
        return Err(format!("no usable route model under {}", data_dir.display()).into());
    }

    let mut store = TowerStore::in_memory()?;
    let imported = store.import(&towers)?;
    log::info!(
        "Loaded {} route vertices, {} stops, {} towers",
        route.len(),
        stops.len(),
        imported
    );

    // Replay every known tower through the mock modem, losing signal
    // for one cycle after every fourth reading
    let mut reader = MockCellReader::new();
    for (i, tower) in towers.iter().enumerate() {
        reader.push_cell(tower.mcc, tower.mnc, tower.lac, tower.cid);
        if i % 4 == 3 {
            reader.push_no_service();
        }
    }
    let cycles = reader.queued_count() as u64;

    let mut config = TrackerConfig::default();
    config.set_poll_interval_ms(500)?;

    let estimator = PositionEstimator::new(Box::new(reader), store, route, stops, config.clone())?;
    let service = TrackingService::start(estimator);

    let formatter = TextFormatter::compact(&config);
    let _printer = service.register_callback(Box::new(move |report| {
        println!("{}", formatter.format_text(report));
    }));

    // One reading per cycle plus one trailing empty cycle
    thread::sleep(Duration::from_millis(config.poll_interval_ms * (cycles + 1)));

    let estimator = service.stop();
    let stats = estimator.stats();
    log::info!(
        "Session done: {} polls, {} resolved ({:.0}% resolution rate), {} tower misses, {} radio errors",
        stats.polls_completed,
        stats.reports_resolved,
        stats.resolution_rate() * 100.0,
        stats.lookup_misses,
        stats.radio_errors
    );

    Ok(())
}
