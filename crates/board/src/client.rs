//! WebSocket client for connecting to a board gateway.
//!
//! [`BoardClient`] holds the connection configuration for one gateway.
//! [`BoardClient::connect`] dials it and authenticates, yielding a
//! [`BoardSession`] for the request/response phase (current-level reads,
//! watch subscription). [`BoardSession::into_parts`] then splits the
//! socket into the PWM command sink and the tick stream.

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream};

use crate::gpio::PwmCommander;
use crate::messages::{
    encode_request, parse_frame, AuthData, BoardEvent, BoardRequest, ReadData, WatchData,
};
use crate::ticks::TickStream;

/// Configuration handle for a board gateway.
///
/// Stores the WebSocket URL and the API-key credentials needed to open an
/// authenticated [`BoardSession`].
pub struct BoardClient {
    address: String,
    api_key: String,
    api_key_id: String,
}

/// An authenticated WebSocket session with the board gateway.
///
/// Supports request/response operations while the socket is un-split;
/// once tick streaming starts (after [`watch_pins`](Self::watch_pins)),
/// call [`into_parts`](Self::into_parts) to obtain the command sink and
/// the tick stream.
pub struct BoardSession {
    address: String,
    ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl BoardClient {
    /// Create a new client targeting a specific gateway.
    ///
    /// * `address`    - WebSocket base URL, e.g. `ws://pi.local:9000`.
    /// * `api_key`    - gateway API key secret.
    /// * `api_key_id` - ID identifying the API key.
    pub fn new(address: String, api_key: String, api_key_id: String) -> Self {
        Self {
            address,
            api_key,
            api_key_id,
        }
    }

    /// WebSocket base URL of the gateway (e.g. `ws://pi.local:9000`).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Connect to the gateway and authenticate.
    ///
    /// Sends the `auth` frame as the first request and waits for the
    /// gateway's verdict before handing out the session.
    pub async fn connect(&self) -> Result<BoardSession, BoardError> {
        let url = format!("{}/ws", self.address);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            BoardError::Connection(format!(
                "Failed to connect to board gateway at {}: {e}",
                self.address
            ))
        })?;

        tracing::info!(address = %self.address, "Connected to board gateway");

        let mut session = BoardSession {
            address: self.address.clone(),
            ws_stream,
        };
        session
            .authenticate(self.api_key.clone(), self.api_key_id.clone())
            .await?;

        Ok(session)
    }
}

impl BoardSession {
    /// Present the API key and wait for the gateway's verdict.
    async fn authenticate(
        &mut self,
        api_key: String,
        api_key_id: String,
    ) -> Result<(), BoardError> {
        let reply = self
            .request(BoardRequest::Auth(AuthData {
                api_key,
                api_key_id,
            }))
            .await?;

        match reply {
            BoardEvent::AuthOk => {
                tracing::info!(address = %self.address, "Board gateway session authenticated");
                Ok(())
            }
            BoardEvent::Error(data) => Err(BoardError::Auth(data.message)),
            other => Err(BoardError::Protocol(format!(
                "Unexpected reply to auth: {other:?}"
            ))),
        }
    }

    /// Query the current level of `pin`.
    pub async fn read_level(&mut self, pin: u8) -> Result<bool, BoardError> {
        let reply = self.request(BoardRequest::Read(ReadData { pin })).await?;

        match reply {
            BoardEvent::Level(data) if data.pin == pin => Ok(data.high),
            BoardEvent::Error(data) => Err(BoardError::Command(data.message)),
            other => Err(BoardError::Protocol(format!(
                "Unexpected reply to read: {other:?}"
            ))),
        }
    }

    /// Subscribe to digital-interrupt ticks for `pins`.
    ///
    /// After the gateway acknowledges, tick frames flow on this socket
    /// indefinitely; no further request/response operations are valid.
    pub async fn watch_pins(&mut self, pins: &[u8]) -> Result<(), BoardError> {
        let reply = self
            .request(BoardRequest::Watch(WatchData {
                pins: pins.to_vec(),
            }))
            .await?;

        match reply {
            BoardEvent::Watching(data) => {
                tracing::info!(pins = ?data.pins, "Watching digital interrupts");
                Ok(())
            }
            BoardEvent::Error(data) => Err(BoardError::Command(data.message)),
            other => Err(BoardError::Protocol(format!(
                "Unexpected reply to watch: {other:?}"
            ))),
        }
    }

    /// Split the session into the PWM command sink and the tick stream.
    ///
    /// `sensor_pin` selects which pin's ticks the stream surfaces; ticks
    /// for other pins are logged and skipped.
    pub fn into_parts(self, sensor_pin: u8) -> (PwmCommander, TickStream) {
        let (sink, stream) = self.ws_stream.split();
        (PwmCommander::new(sink), TickStream::new(stream, sensor_pin))
    }

    /// Send one request frame and wait for the gateway's reply.
    ///
    /// Only valid during the handshake phase: the gateway answers every
    /// request before pushing any tick, so the next event frame is the
    /// reply.
    async fn request(&mut self, request: BoardRequest) -> Result<BoardEvent, BoardError> {
        let json = encode_request(&request);
        self.ws_stream
            .send(Message::Text(json))
            .await
            .map_err(|e| BoardError::Connection(format!("Failed to send request: {e}")))?;

        while let Some(msg) = self.ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    return parse_frame(&text).map_err(|e| {
                        BoardError::Protocol(format!("Malformed gateway frame: {e}"))
                    });
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Handled automatically by tungstenite.
                }
                Ok(Message::Close(frame)) => {
                    return Err(BoardError::Connection(format!(
                        "Gateway closed during handshake: {frame:?}"
                    )));
                }
                Ok(_) => {
                    // Binary / Frame — ignore.
                }
                Err(e) => {
                    return Err(BoardError::Connection(format!(
                        "WebSocket receive error: {e}"
                    )));
                }
            }
        }

        Err(BoardError::Connection(
            "Gateway stream ended during handshake".to_string(),
        ))
    }
}

/// Errors that can occur when talking to the board gateway.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Failed to establish or keep the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The gateway rejected the API-key credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A malformed or unexpected frame on an established connection.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The gateway reported a device command failure.
    #[error("Command error: {0}")]
    Command(String),
}
