//! Canonical notification texts sent by the monitor.
//!
//! These are the exact strings pushed to the notification channel on each
//! alarm transition; tests assert against them verbatim.

/// Sent when a leak is first detected.
pub const LEAK_DETECTED_MESSAGE: &str = "A leak has been detected in the upstairs bathroom!";

/// Sent when a previously detected leak clears.
pub const LEAK_RESOLVED_MESSAGE: &str = "The leak has been resolved";
