//! Background tracking service with observable reports
//!
//! The service owns the estimator for the whole session: `start` moves
//! it onto a worker thread and `stop` hands it back, so nothing else
//! can touch the reader or the tower store while polling runs.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::api::engine::PositionEstimator;
use crate::api::types::{ApiError, ApiResult, PositionReport};

/// Callback invoked on the worker thread with each fresh report.
///
/// Callbacks must return quickly and must not call back into the
/// service's registration methods.
pub type ReportCallback = Box<dyn Fn(&PositionReport) + Send>;

/// Opaque handle identifying a registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

struct ServiceState {
    latest: PositionReport,
    stopping: bool,
}

struct CallbackTable {
    next_id: u32,
    entries: HashMap<CallbackHandle, ReportCallback>,
}

struct ServiceShared {
    state: Mutex<ServiceState>,
    wake: Condvar,
    callbacks: Mutex<CallbackTable>,
}

/// Periodic poll loop around a `PositionEstimator`.
///
/// Runs one estimation cycle every `poll_interval_ms`, publishes the
/// result as the latest report, and fans it out to registered
/// callbacks. A slow cycle delays the next one rather than stacking
/// up; every cycle recomputes from current state, so nothing is lost.
pub struct TrackingService {
    shared: Arc<ServiceShared>,
    worker: thread::JoinHandle<PositionEstimator>,
}

impl TrackingService {
    /// Move the estimator onto a worker thread and begin polling.
    ///
    /// The first cycle runs immediately rather than one interval in.
    pub fn start(estimator: PositionEstimator) -> Self {
        let shared = Arc::new(ServiceShared {
            state: Mutex::new(ServiceState {
                latest: PositionReport::Unresolved,
                stopping: false,
            }),
            wake: Condvar::new(),
            callbacks: Mutex::new(CallbackTable {
                next_id: 0,
                entries: HashMap::new(),
            }),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || run_loop(estimator, worker_shared));

        log::info!("Tracking service started");
        Self { shared, worker }
    }

    /// Most recent report, `Unresolved` until the first cycle lands
    pub fn latest(&self) -> PositionReport {
        self.shared.state.lock().unwrap().latest.clone()
    }

    /// Register a callback for report updates.
    ///
    /// The callback is invoked once immediately with the current
    /// report, so late subscribers do not wait a full interval for
    /// their first value.
    pub fn register_callback(&self, callback: ReportCallback) -> CallbackHandle {
        callback(&self.latest());

        let mut callbacks = self.shared.callbacks.lock().unwrap();
        callbacks.next_id += 1;
        let handle = CallbackHandle::new(callbacks.next_id);
        callbacks.entries.insert(handle, callback);
        handle
    }

    /// Remove a previously registered callback
    pub fn unregister_callback(&self, handle: CallbackHandle) -> ApiResult<()> {
        let mut callbacks = self.shared.callbacks.lock().unwrap();
        match callbacks.entries.remove(&handle) {
            Some(_) => Ok(()),
            None => Err(ApiError::InvalidRequest {
                reason: format!("Unknown callback handle {}", handle.id()),
            }),
        }
    }

    /// Stop polling and hand the estimator back to the caller.
    ///
    /// Blocks until the worker finishes its current cycle. The
    /// returned estimator keeps its direction state and statistics,
    /// so a session can be resumed later.
    pub fn stop(self) -> PositionEstimator {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stopping = true;
        }
        self.shared.wake.notify_all();

        log::info!("Tracking service stopping");
        match self.worker.join() {
            Ok(estimator) => estimator,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

fn run_loop(mut estimator: PositionEstimator, shared: Arc<ServiceShared>) -> PositionEstimator {
    let interval = Duration::from_millis(estimator.config().poll_interval_ms);

    loop {
        let report = estimator.poll();

        {
            let mut state = shared.state.lock().unwrap();
            state.latest = report.clone();
        }
        {
            let callbacks = shared.callbacks.lock().unwrap();
            for callback in callbacks.entries.values() {
                callback(&report);
            }
        }

        // Wait out the rest of the interval, leaving early on stop
        let deadline = Instant::now() + interval;
        let mut state = shared.state.lock().unwrap();
        loop {
            if state.stopping {
                return estimator;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (next, _timeout) = shared.wake.wait_timeout(state, deadline - now).unwrap();
            state = next;
        }
    }
}
