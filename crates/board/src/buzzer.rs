//! Buzzer adapter: drives the monitor's alert signal over gateway PWM.

use leakwatch_core::{AlertSignal, EffectError};

use crate::gpio::PwmCommander;

/// PWM-driven buzzer on a gateway pin.
///
/// Implements [`AlertSignal`] so the state machine can raise and silence
/// the alarm without knowing about the gateway protocol.
pub struct Buzzer {
    commander: PwmCommander,
    pin: u8,
}

impl Buzzer {
    /// Create a buzzer on `pin` driving commands through `commander`.
    pub fn new(commander: PwmCommander, pin: u8) -> Self {
        Self { commander, pin }
    }
}

impl AlertSignal for Buzzer {
    /// Frequency is set before duty so the buzzer never sounds at a stale
    /// frequency.
    async fn activate(&mut self, frequency_hz: u32, intensity: f64) -> Result<(), EffectError> {
        self.commander
            .set_pwm_frequency(self.pin, frequency_hz)
            .await
            .map_err(|e| EffectError::Actuator(e.to_string()))?;
        self.commander
            .set_pwm(self.pin, intensity)
            .await
            .map_err(|e| EffectError::Actuator(e.to_string()))
    }

    async fn silence(&mut self) -> Result<(), EffectError> {
        self.commander
            .set_pwm(self.pin, 0.0)
            .await
            .map_err(|e| EffectError::Actuator(e.to_string()))
    }
}
