//! The leak state machine and its event loop.
//!
//! [`LeakStateMachine`] owns the [`AlarmState`] plus the two side-effect
//! handles. It is the single consumer of the sensor stream: one event is
//! fully processed (actuator command, then notification, then state
//! update) before the next is read, so effects are never reordered across
//! events and the actuator always precedes the notification within one
//! transition.

use tokio_util::sync::CancellationToken;

use crate::alarm::{transition, AlarmState, LeakEdge};
use crate::effects::{AlertSignal, Messenger, ALERT_FREQUENCY_HZ, ALERT_INTENSITY};
use crate::messages::{LEAK_DETECTED_MESSAGE, LEAK_RESOLVED_MESSAGE};
use crate::sensor::LevelSource;

/// Edge-triggered monitor over a single leak sensor.
pub struct LeakStateMachine<S, N> {
    state: AlarmState,
    signal: S,
    notifier: N,
}

impl<S, N> LeakStateMachine<S, N>
where
    S: AlertSignal,
    N: Messenger,
{
    /// Create a machine in the initial [`AlarmState::Clear`] state.
    pub fn new(signal: S, notifier: N) -> Self {
        Self {
            state: AlarmState::Clear,
            signal,
            notifier,
        }
    }

    /// The current alarm state.
    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Apply one sensor level: run the transition table, dispatch effects
    /// on a confirmed edge, then commit the new state.
    ///
    /// Effect failures are logged and isolated; they never prevent the
    /// state from advancing, because the alarm state tracks the sensor's
    /// physical reality rather than the actuator's health.
    pub async fn process_level(&mut self, high: bool) {
        let (next, edge) = transition(self.state, high);
        let Some(edge) = edge else {
            return;
        };

        match edge {
            LeakEdge::Detected => {
                tracing::info!(state = ?next, "Leak detected, raising alarm");
                if let Err(e) = self
                    .signal
                    .activate(ALERT_FREQUENCY_HZ, ALERT_INTENSITY)
                    .await
                {
                    tracing::error!(error = %e, "Alert signal activation failed");
                }
                if let Err(e) = self.notifier.send(LEAK_DETECTED_MESSAGE, None).await {
                    tracing::warn!(error = %e, "Leak notification not delivered");
                }
            }
            LeakEdge::Resolved => {
                tracing::info!(state = ?next, "Leak resolved, clearing alarm");
                if let Err(e) = self.signal.silence().await {
                    tracing::error!(error = %e, "Alert signal silence failed");
                }
                if let Err(e) = self.notifier.send(LEAK_RESOLVED_MESSAGE, None).await {
                    tracing::warn!(error = %e, "Resolution notification not delivered");
                }
            }
        }

        self.state = next;
    }

    /// Consume the sensor stream until it ends or `cancel` fires.
    ///
    /// Events are processed strictly in arrival order, one at a time.
    /// The select is biased towards cancellation: once the token fires, no
    /// further event is read (even one already waiting); an in-flight
    /// transition still completes. A `None` from the source is the
    /// stream's normal end and stops the loop without error.
    pub async fn run<L>(&mut self, levels: &mut L, cancel: CancellationToken)
    where
        L: LevelSource,
    {
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("Leak monitor cancelled, stopping");
                    break;
                }
                event = levels.next_level() => {
                    match event {
                        Some(event) => self.process_level(event.high).await,
                        None => {
                            tracing::info!("Sensor stream ended, stopping");
                            break;
                        }
                    }
                }
            }
        }
    }
}
