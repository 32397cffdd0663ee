//! Core leak-monitoring logic: alarm state, transitions, and the event loop.
//!
//! This crate carries the transport-independent heart of the monitor:
//!
//! - [`AlarmState`] and [`transition`] — the pure edge-trigger table.
//! - [`LeakStateMachine`] — owns the alarm state, dispatches actuator and
//!   notification effects on confirmed transitions, and runs the single
//!   sequential consumer loop.
//! - [`LevelSource`], [`AlertSignal`], [`Messenger`] — seams implemented by
//!   the board and notification adapter crates.
//!
//! All hardware and network specifics live behind those seams so the
//! transition logic can be tested in isolation.

pub mod alarm;
pub mod effects;
pub mod machine;
pub mod messages;
pub mod sensor;

pub use alarm::{transition, AlarmState, LeakEdge};
pub use effects::{AlertSignal, EffectError, Messenger, ALERT_FREQUENCY_HZ, ALERT_INTENSITY};
pub use machine::LeakStateMachine;
pub use sensor::{LevelEvent, LevelSource};
