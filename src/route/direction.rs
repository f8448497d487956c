//! Direction-of-travel inference from consecutive route indices

use crate::core::{TrackerState, TravelDirection};

/// Fold one snapped route index into the tracker state.
///
/// Pure transition: the caller owns the state and applies the returned
/// value once its poll cycle completes. The first observed index only
/// seeds `previous_route_index`; afterwards the direction flips only when
/// the index moved by at least `hysteresis` positions, which suppresses
/// flicker from a stationary bus or a noisy snap. The previous index is
/// always overwritten.
pub fn advance(state: TrackerState, current_index: usize, hysteresis: u32) -> TrackerState {
    let direction = match state.previous_route_index {
        None => state.direction,
        Some(previous) => {
            let delta = current_index as i64 - previous as i64;
            if delta.unsigned_abs() >= u64::from(hysteresis) && delta != 0 {
                if delta > 0 {
                    TravelDirection::Forward
                } else {
                    TravelDirection::Backward
                }
            } else {
                state.direction
            }
        }
    };

    TrackerState {
        previous_route_index: Some(current_index),
        direction,
    }
}
