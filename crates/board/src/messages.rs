//! Board gateway wire frames and parser.
//!
//! The gateway speaks JSON over WebSocket with the shape
//! `{"type": "<kind>", "data": {...}}` in both directions. Requests are
//! built from [`BoardRequest`] and incoming frames parsed into a
//! strongly-typed [`BoardEvent`] enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requests sent from the monitor to the gateway.
///
/// Serialized via the internally-tagged `"type"` field with associated
/// `"data"` content.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardRequest {
    /// Authenticate the session; must be the first frame after connect.
    #[serde(rename = "auth")]
    Auth(AuthData),

    /// Query the current level of a pin.
    #[serde(rename = "read")]
    Read(ReadData),

    /// Subscribe to digital-interrupt ticks for the given pins.
    #[serde(rename = "watch")]
    Watch(WatchData),

    /// Set the PWM frequency of a pin.
    #[serde(rename = "set_pwm_frequency")]
    SetPwmFrequency(SetPwmFrequencyData),

    /// Set the PWM duty cycle of a pin.
    #[serde(rename = "set_pwm")]
    SetPwm(SetPwmData),
}

/// Payload for `auth` requests.
#[derive(Debug, Clone, Serialize)]
pub struct AuthData {
    pub api_key: String,
    pub api_key_id: String,
}

/// Payload for `read` requests.
#[derive(Debug, Clone, Serialize)]
pub struct ReadData {
    pub pin: u8,
}

/// Payload for `watch` requests.
#[derive(Debug, Clone, Serialize)]
pub struct WatchData {
    /// Pins to receive digital-interrupt ticks for.
    pub pins: Vec<u8>,
}

/// Payload for `set_pwm_frequency` requests.
#[derive(Debug, Clone, Serialize)]
pub struct SetPwmFrequencyData {
    pub pin: u8,
    pub frequency_hz: u32,
}

/// Payload for `set_pwm` requests.
#[derive(Debug, Clone, Serialize)]
pub struct SetPwmData {
    pub pin: u8,
    /// Duty cycle in the range 0.0-1.0; 0.0 silences the pin.
    pub duty: f64,
}

/// All known gateway frames sent to the monitor.
///
/// Deserialized via the internally-tagged `"type"` field with associated
/// `"data"` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardEvent {
    /// Authentication accepted; the session may issue requests.
    #[serde(rename = "auth_ok")]
    AuthOk,

    /// Reply to a `read` request.
    #[serde(rename = "level")]
    Level(LevelData),

    /// Acknowledgment of a `watch` request; ticks follow.
    #[serde(rename = "watching")]
    Watching(WatchingData),

    /// A digital-interrupt level change on a watched pin.
    #[serde(rename = "tick")]
    Tick(TickData),

    /// Request or device failure reported by the gateway.
    #[serde(rename = "error")]
    Error(ErrorData),
}

/// Payload for `level` frames.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub pin: u8,
    pub high: bool,
}

/// Payload for `watching` frames.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchingData {
    /// Pins now being watched.
    #[serde(default)]
    pub pins: Vec<u8>,
}

/// Payload for `tick` frames.
#[derive(Debug, Clone, Deserialize)]
pub struct TickData {
    pub pin: u8,
    /// The new level after the interrupt fired.
    pub high: bool,
    /// Gateway-assigned timestamp of the interrupt.
    pub at: DateTime<Utc>,
}

/// Payload for `error` frames.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorData {
    pub message: String,
}

/// Serialize a request into a JSON text frame.
pub fn encode_request(request: &BoardRequest) -> String {
    serde_json::to_string(request).expect("BoardRequest is always serialisable")
}

/// Parse a gateway text frame into a typed enum.
///
/// Returns `Err` for malformed JSON or unknown `type` values.
/// Callers should log unknown types and continue.
pub fn parse_frame(text: &str) -> Result<BoardEvent, serde_json::Error> {
    serde_json::from_str(text)
}
