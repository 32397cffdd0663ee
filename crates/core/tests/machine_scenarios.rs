//! Integration tests for [`LeakStateMachine`].
//!
//! Drives the machine with scripted level sequences through recording
//! doubles and verifies the edge-trigger contract: effects fire exactly
//! once per transition, actuator before notification, and effect failures
//! never stall the loop or the state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use tokio_util::sync::CancellationToken;

use leakwatch_core::{
    AlarmState, AlertSignal, EffectError, LeakStateMachine, LevelEvent, LevelSource, Messenger,
};

// ---------------------------------------------------------------------------
// Recording doubles
// ---------------------------------------------------------------------------

/// One recorded side-effect call, in dispatch order.
#[derive(Debug, Clone, PartialEq)]
enum EffectCall {
    Activate { frequency_hz: u32, intensity: f64 },
    Silence,
    Send { message: String, topic: Option<String> },
}

/// Log shared between both doubles so cross-effect ordering is observable.
type CallLog = Arc<Mutex<Vec<EffectCall>>>;

struct RecordingSignal {
    log: CallLog,
    fail: bool,
}

impl AlertSignal for RecordingSignal {
    async fn activate(&mut self, frequency_hz: u32, intensity: f64) -> Result<(), EffectError> {
        self.log.lock().unwrap().push(EffectCall::Activate {
            frequency_hz,
            intensity,
        });
        if self.fail {
            return Err(EffectError::Actuator("buzzer offline".to_string()));
        }
        Ok(())
    }

    async fn silence(&mut self) -> Result<(), EffectError> {
        self.log.lock().unwrap().push(EffectCall::Silence);
        if self.fail {
            return Err(EffectError::Actuator("buzzer offline".to_string()));
        }
        Ok(())
    }
}

struct RecordingMessenger {
    log: CallLog,
    fail: bool,
}

impl Messenger for RecordingMessenger {
    async fn send(&self, message: &str, topic: Option<&str>) -> Result<(), EffectError> {
        self.log.lock().unwrap().push(EffectCall::Send {
            message: message.to_string(),
            topic: topic.map(str::to_string),
        });
        if self.fail {
            return Err(EffectError::Delivery("HTTP 503".to_string()));
        }
        Ok(())
    }
}

/// Replays a fixed level sequence, then reports end-of-stream.
struct ScriptedLevels {
    levels: VecDeque<bool>,
}

impl ScriptedLevels {
    fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
        }
    }
}

impl LevelSource for ScriptedLevels {
    async fn next_level(&mut self) -> Option<LevelEvent> {
        self.levels.pop_front().map(|high| LevelEvent { high })
    }
}

/// Never yields an event; used to exercise cancellation.
struct PendingLevels;

impl LevelSource for PendingLevels {
    async fn next_level(&mut self) -> Option<LevelEvent> {
        std::future::pending().await
    }
}

fn recording_machine(
    signal_fails: bool,
    notifier_fails: bool,
) -> (LeakStateMachine<RecordingSignal, RecordingMessenger>, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let signal = RecordingSignal {
        log: Arc::clone(&log),
        fail: signal_fails,
    };
    let notifier = RecordingMessenger {
        log: Arc::clone(&log),
        fail: notifier_fails,
    };
    (LeakStateMachine::new(signal, notifier), log)
}

/// Run the machine over a scripted sequence until the stream ends.
async fn drive(
    machine: &mut LeakStateMachine<RecordingSignal, RecordingMessenger>,
    levels: &[bool],
) {
    let mut source = ScriptedLevels::new(levels);
    machine.run(&mut source, CancellationToken::new()).await;
}

// ---------------------------------------------------------------------------
// Test: initial state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_machine_starts_clear() {
    let (machine, log) = recording_machine(false, false);

    assert_eq!(machine.state(), AlarmState::Clear);
    assert!(log.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: dry samples are no-ops
// ---------------------------------------------------------------------------

/// A dry line that stays dry produces no actuator calls, no notifications,
/// and leaves the state untouched.
#[tokio::test]
async fn dry_samples_produce_no_effects() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[false, false]).await;

    assert_eq!(machine.state(), AlarmState::Clear);
    assert!(log.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: first wet sample raises the alarm
// ---------------------------------------------------------------------------

/// One wet sample activates the buzzer with the fixed tone parameters and
/// pushes the detection message to the default topic, in that order.
#[tokio::test]
async fn first_wet_sample_raises_alarm() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[true]).await;

    assert_eq!(machine.state(), AlarmState::Active);
    let calls = log.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            EffectCall::Activate {
                frequency_hz: 423,
                intensity: 0.5,
            },
            EffectCall::Send {
                message: "A leak has been detected in the upstairs bathroom!".to_string(),
                topic: None,
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: sustained wet level triggers exactly once
// ---------------------------------------------------------------------------

/// Repeated wet samples after the first are no-ops: one activation, one
/// notification, no matter how long the level holds.
#[tokio::test]
async fn sustained_wet_level_triggers_once() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[true, true, true]).await;

    assert_eq!(machine.state(), AlarmState::Active);
    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2, "expected exactly one activate + one send");
    assert_matches!(calls[0], EffectCall::Activate { .. });
    assert_matches!(calls[1], EffectCall::Send { .. });
}

// ---------------------------------------------------------------------------
// Test: full leak cycle alerts then clears
// ---------------------------------------------------------------------------

/// Wet then dry walks the machine through both edges: activate + detection
/// message, then silence + resolution message, actuator first each time.
#[tokio::test]
async fn full_leak_cycle_alerts_then_clears() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[true, false]).await;

    assert_eq!(machine.state(), AlarmState::Clear);
    let calls = log.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            EffectCall::Activate {
                frequency_hz: 423,
                intensity: 0.5,
            },
            EffectCall::Send {
                message: "A leak has been detected in the upstairs bathroom!".to_string(),
                topic: None,
            },
            EffectCall::Silence,
            EffectCall::Send {
                message: "The leak has been resolved".to_string(),
                topic: None,
            },
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: sustained dry level after a cycle clears exactly once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sustained_dry_level_clears_once() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[true, false, false, false]).await;

    assert_eq!(machine.state(), AlarmState::Clear);
    let calls = log.lock().unwrap();
    // One activate + send for the leak, one silence + send for the
    // resolution. The trailing dry samples add nothing.
    assert_eq!(calls.len(), 4);
    assert_matches!(calls[2], EffectCall::Silence);
}

// ---------------------------------------------------------------------------
// Test: notifier failure does not stall the loop or the state
// ---------------------------------------------------------------------------

/// A failing notification transport never blocks the transition: the state
/// still advances, the actuator still fires, and later events are still
/// processed.
#[tokio::test]
async fn notifier_failure_does_not_stall_the_loop() {
    let (mut machine, log) = recording_machine(false, true);

    drive(&mut machine, &[true]).await;
    assert_eq!(machine.state(), AlarmState::Active);

    // The loop keeps consuming; the resolution edge is still processed.
    drive(&mut machine, &[false]).await;
    assert_eq!(machine.state(), AlarmState::Clear);

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 4, "both edges should attempt both effects");
}

// ---------------------------------------------------------------------------
// Test: actuator failure still notifies and advances state
// ---------------------------------------------------------------------------

/// A broken buzzer must not suppress the human-facing notification or hold
/// the state back; the alarm state tracks the sensor, not the actuator.
#[tokio::test]
async fn actuator_failure_still_notifies_and_advances_state() {
    let (mut machine, log) = recording_machine(true, false);

    drive(&mut machine, &[true]).await;

    assert_eq!(machine.state(), AlarmState::Active);
    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_matches!(calls[0], EffectCall::Activate { .. });
    assert_matches!(
        calls[1],
        EffectCall::Send { ref message, .. } if message.contains("leak has been detected")
    );
}

// ---------------------------------------------------------------------------
// Test: state persists across interleaved no-ops
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_persists_across_noop_samples() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[false, true, true, false, false, true]).await;

    // Edges at samples 2 (detect), 4 (resolve), 6 (detect again).
    assert_eq!(machine.state(), AlarmState::Active);
    assert_eq!(log.lock().unwrap().len(), 6);
}

// ---------------------------------------------------------------------------
// Test: empty stream ends the loop cleanly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_end_stops_the_loop() {
    let (mut machine, log) = recording_machine(false, false);

    drive(&mut machine, &[]).await;

    assert_eq!(machine.state(), AlarmState::Clear);
    assert!(log.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: cancellation stops the loop without processing further events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancellation_stops_the_loop() {
    let (machine, log) = recording_machine(false, false);
    let cancel = CancellationToken::new();
    let child = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut machine = machine;
        let mut source = PendingLevels;
        machine.run(&mut source, child).await;
        machine
    });

    cancel.cancel();
    let machine = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("run should stop promptly after cancellation")
        .expect("monitor task should not panic");

    assert_eq!(machine.state(), AlarmState::Clear);
    assert!(log.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: cancellation wins over an already-ready event
// ---------------------------------------------------------------------------

/// A token cancelled before the loop starts suppresses even events already
/// waiting in the source: once shutdown has begun, nothing is dispatched.
#[tokio::test]
async fn no_events_processed_after_cancellation() {
    let (mut machine, log) = recording_machine(false, false);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut source = ScriptedLevels::new(&[true]);
    machine.run(&mut source, cancel).await;

    assert_eq!(machine.state(), AlarmState::Clear);
    assert!(log.lock().unwrap().is_empty());
}
