//! Sensor level observations and the live source seam.

/// A single boolean level observation from the leak sensor.
///
/// Consumed immediately by the state machine; observations are not
/// retained or buffered beyond the one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelEvent {
    /// Whether the sensor line reads high (water present).
    pub high: bool,
}

/// A live, possibly unbounded sequence of sensor level changes.
///
/// `next_level` blocks until the next observation arrives and returns
/// `None` once the underlying stream has terminated. The sequence is not
/// restartable; a new source must be created to resume watching.
pub trait LevelSource: Send {
    /// Wait for the next level observation.
    fn next_level(&mut self) -> impl std::future::Future<Output = Option<LevelEvent>> + Send;
}
