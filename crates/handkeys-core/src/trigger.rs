//! Debounce gate between classification and dispatch.
//!
//! A gesture fires when it differs from the last fired gesture, or when more
//! than the debounce delay has passed since that gesture fired. Holding a
//! gesture therefore repeats its action once per delay window.

use serde::Serialize;

use crate::gesture::GestureName;

/// Default minimum spacing between repeats of the same gesture, in seconds.
pub const DEBOUNCE_DELAY: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TriggerState {
    pub last_fired: Option<GestureName>,
    /// Seconds on the same clock as the `now` passed to [`gate`].
    pub last_fired_at: f64,
}

/// Decide whether `current` fires at time `now`.
///
/// Returns the next state and whether to dispatch. The elapsed-time check is
/// strict: a repeat exactly `delay` seconds after the last fire is suppressed.
pub fn gate(
    state: TriggerState,
    current: Option<GestureName>,
    now: f64,
    delay: f64,
) -> (TriggerState, bool) {
    let Some(gesture) = current else {
        return (state, false);
    };
    let fire = state.last_fired != Some(gesture) || now - state.last_fired_at > delay;
    if fire {
        let next = TriggerState {
            last_fired: Some(gesture),
            last_fired_at: now,
        };
        (next, true)
    } else {
        (state, false)
    }
}
