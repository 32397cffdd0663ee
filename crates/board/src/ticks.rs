//! Tick stream reader: the live level source for the monitor.
//!
//! Wraps the read half of the gateway socket and surfaces digital-interrupt
//! ticks for the sensor pin as [`LevelEvent`]s. Everything else (ticks for
//! other pins, gateway error reports, stray acks, malformed frames) is
//! logged and skipped. A Close frame or a receive error ends the stream.

use futures::stream::SplitStream;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use leakwatch_core::{LevelEvent, LevelSource};

use crate::messages::{parse_frame, BoardEvent};

/// Live sequence of sensor level changes from the gateway.
pub struct TickStream {
    stream: SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>,
    sensor_pin: u8,
}

impl TickStream {
    pub(crate) fn new(
        stream: SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>,
        sensor_pin: u8,
    ) -> Self {
        Self { stream, sensor_pin }
    }

    /// Read frames until one carries a sensor tick or the stream ends.
    async fn next_tick(&mut self) -> Option<LevelEvent> {
        while let Some(msg) = self.stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Some(event) = sensor_level(&text, self.sensor_pin) {
                        return Some(event);
                    }
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Handled automatically by tungstenite.
                }
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "Board gateway closed the stream");
                    return None;
                }
                Ok(_) => {
                    // Binary / Frame — ignore.
                }
                Err(e) => {
                    tracing::error!(error = %e, "WebSocket receive error");
                    return None;
                }
            }
        }
        None
    }
}

impl LevelSource for TickStream {
    async fn next_level(&mut self) -> Option<LevelEvent> {
        self.next_tick().await
    }
}

/// Extract a sensor-pin level change from one text frame.
///
/// Returns `None` for every frame that is not a tick on `sensor_pin`,
/// logging gateway error reports at warn level along the way.
fn sensor_level(text: &str, sensor_pin: u8) -> Option<LevelEvent> {
    match parse_frame(text) {
        Ok(BoardEvent::Tick(data)) if data.pin == sensor_pin => {
            tracing::debug!(pin = data.pin, high = data.high, at = %data.at, "Sensor tick");
            Some(LevelEvent { high: data.high })
        }
        Ok(BoardEvent::Tick(data)) => {
            tracing::debug!(pin = data.pin, "Ignoring tick for unwatched pin");
            None
        }
        Ok(BoardEvent::Error(data)) => {
            tracing::warn!(message = %data.message, "Board gateway reported an error");
            None
        }
        Ok(other) => {
            tracing::debug!(?other, "Ignoring non-tick gateway frame");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, raw_frame = %text, "Failed to parse gateway frame");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
