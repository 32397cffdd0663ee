//! Board gateway WebSocket client.
//!
//! Connects the monitor to the device server fronting the physical board's
//! GPIO: API-key authentication, current-level reads, digital-interrupt
//! tick streaming, and PWM control, all as typed JSON frames over a single
//! WebSocket.

pub mod buzzer;
pub mod client;
pub mod gpio;
pub mod messages;
pub mod ticks;

pub use buzzer::Buzzer;
pub use client::{BoardClient, BoardError, BoardSession};
pub use gpio::PwmCommander;
pub use ticks::TickStream;
