//! Side-effect seams for the monitor: alert signal and messenger.
//!
//! Defines [`AlertSignal`] and [`Messenger`], the traits the hardware and
//! notification adapters implement, along with [`EffectError`] and the
//! fixed alert tone parameters.

/// PWM frequency driven while the alarm is active, in hertz.
pub const ALERT_FREQUENCY_HZ: u32 = 423;

/// PWM duty cycle driven while the alarm is active (0.0-1.0).
pub const ALERT_INTENSITY: f64 = 0.5;

/// Errors raised by side-effect collaborators.
///
/// Both variants are non-fatal to the monitor loop: the state machine logs
/// them and moves on, and the already-decided state transition stands.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The actuator rejected or failed to apply a command.
    #[error("Actuator command failed: {0}")]
    Actuator(String),

    /// The notification transport failed to deliver the message.
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Continuous alert output, typically a PWM-driven buzzer.
///
/// Implementations hold no alarm state of their own; the state machine
/// decides when to activate and silence. Re-applying parameters while
/// already active is a valid, idempotent call.
pub trait AlertSignal: Send {
    /// Start emitting at `frequency_hz` with the given intensity (0.0-1.0).
    fn activate(
        &mut self,
        frequency_hz: u32,
        intensity: f64,
    ) -> impl std::future::Future<Output = Result<(), EffectError>> + Send;

    /// Stop emitting (drive the intensity to zero).
    fn silence(&mut self) -> impl std::future::Future<Output = Result<(), EffectError>> + Send;
}

/// Best-effort text notification channel.
pub trait Messenger: Send {
    /// Deliver `message` to `topic`, or to the configured default topic
    /// when `topic` is `None`.
    ///
    /// Exactly one delivery attempt is made; there is no retry and no
    /// acknowledgment beyond the transport-level success of the call.
    fn send(
        &self,
        message: &str,
        topic: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), EffectError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_actuator() {
        let err = EffectError::Actuator("pin 23 unavailable".to_string());
        assert_eq!(err.to_string(), "Actuator command failed: pin 23 unavailable");
    }

    #[test]
    fn display_delivery() {
        let err = EffectError::Delivery("HTTP 503".to_string());
        assert_eq!(err.to_string(), "Notification delivery failed: HTTP 503");
    }
}
