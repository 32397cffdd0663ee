//! PWM command surface over the write half of the gateway socket.
//!
//! Commands are fire-and-forget: the gateway does not acknowledge them on
//! this socket, and asynchronous `error` frames it pushes instead are
//! logged by the tick stream reader.

use futures::stream::SplitSink;
use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::client::BoardError;
use crate::messages::{encode_request, BoardRequest, SetPwmData, SetPwmFrequencyData};

/// Issues PWM commands to gateway pins.
pub struct PwmCommander {
    sink: SplitSink<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>, Message>,
}

impl PwmCommander {
    pub(crate) fn new(
        sink: SplitSink<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>, Message>,
    ) -> Self {
        Self { sink }
    }

    /// Set the PWM frequency of `pin` in hertz.
    pub async fn set_pwm_frequency(
        &mut self,
        pin: u8,
        frequency_hz: u32,
    ) -> Result<(), BoardError> {
        tracing::debug!(pin, frequency_hz, "Setting PWM frequency");
        send_request(
            &mut self.sink,
            &BoardRequest::SetPwmFrequency(SetPwmFrequencyData { pin, frequency_hz }),
        )
        .await
    }

    /// Set the PWM duty cycle of `pin` (0.0-1.0; 0.0 silences it).
    pub async fn set_pwm(&mut self, pin: u8, duty: f64) -> Result<(), BoardError> {
        tracing::debug!(pin, duty, "Setting PWM duty cycle");
        send_request(
            &mut self.sink,
            &BoardRequest::SetPwm(SetPwmData { pin, duty }),
        )
        .await
    }
}

/// Serialize a request and send it as a JSON text frame.
async fn send_request<S>(sink: &mut S, request: &BoardRequest) -> Result<(), BoardError>
where
    S: SinkExt<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let json = encode_request(request);
    sink.send(Message::Text(json))
        .await
        .map_err(|e| BoardError::Command(format!("Failed to send GPIO command: {e}")))
}
