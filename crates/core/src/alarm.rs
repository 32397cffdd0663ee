//! Alarm state and the edge-trigger transition table.
//!
//! Pure logic — no I/O. The state machine in [`crate::machine`] feeds each
//! sensor level through [`transition`] and acts on the returned edge.

use serde::Serialize;

/// The two-state leak alarm condition.
///
/// Exactly one value is current at any time. The monitor starts in
/// [`AlarmState::Clear`]; the state lives for the whole process run and is
/// only ever changed through [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    /// No leak currently detected.
    Clear,
    /// A leak has been detected and not yet resolved.
    Active,
}

/// A confirmed state change produced by [`transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeakEdge {
    /// The sensor line went wet while the alarm was clear.
    Detected,
    /// The sensor line went dry while the alarm was active.
    Resolved,
}

/// Apply one sensor level to the current alarm state.
///
/// Edge-triggered: the level is compared against the alarm state itself,
/// not against the previous raw sample, so a sustained level produces an
/// edge exactly once. Returns the next state plus the edge, or `None` when
/// the observation merely confirms the current state.
pub fn transition(state: AlarmState, high: bool) -> (AlarmState, Option<LeakEdge>) {
    match (state, high) {
        (AlarmState::Clear, true) => (AlarmState::Active, Some(LeakEdge::Detected)),
        (AlarmState::Active, false) => (AlarmState::Clear, Some(LeakEdge::Resolved)),
        // Level agrees with the current state: nothing to do.
        (AlarmState::Clear, false) => (AlarmState::Clear, None),
        (AlarmState::Active, true) => (AlarmState::Active, None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
