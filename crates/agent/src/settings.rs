//! Environment-based configuration for the monitor daemon.

/// Default GPIO pin the leak sensor is wired to.
const DEFAULT_SENSOR_PIN: u8 = 8;

/// Default GPIO pin the buzzer is wired to.
const DEFAULT_BUZZER_PIN: u8 = 23;

/// Default ntfy server base URL.
const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";

/// Default ntfy topic for leak notifications.
const DEFAULT_NTFY_TOPIC: &str = "home_alerts";

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A required environment variable is not set.
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("{0} must be {1}")]
    InvalidVar(&'static str, &'static str),
}

/// Runtime configuration for the monitor daemon.
///
/// Loaded once at startup and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Settings {
    /// WebSocket base URL of the board gateway.
    pub board_address: String,
    /// Gateway API key secret.
    pub board_api_key: String,
    /// ID identifying the gateway API key.
    pub board_api_key_id: String,
    /// GPIO pin of the leak sensor.
    pub sensor_pin: u8,
    /// GPIO pin of the buzzer.
    pub buzzer_pin: u8,
    /// ntfy server base URL.
    pub ntfy_server: String,
    /// Default notification topic.
    pub ntfy_topic: String,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// | Variable           | Required | Default           |
    /// |--------------------|----------|-------------------|
    /// | `BOARD_ADDRESS`    | yes      | --                |
    /// | `BOARD_API_KEY`    | yes      | --                |
    /// | `BOARD_API_KEY_ID` | yes      | --                |
    /// | `SENSOR_PIN`       | no       | `8`               |
    /// | `BUZZER_PIN`       | no       | `23`              |
    /// | `NTFY_SERVER`      | no       | `https://ntfy.sh` |
    /// | `NTFY_TOPIC`       | no       | `home_alerts`     |
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            board_address: require("BOARD_ADDRESS")?,
            board_api_key: require("BOARD_API_KEY")?,
            board_api_key_id: require("BOARD_API_KEY_ID")?,
            sensor_pin: pin_var("SENSOR_PIN", DEFAULT_SENSOR_PIN)?,
            buzzer_pin: pin_var("BUZZER_PIN", DEFAULT_BUZZER_PIN)?,
            ntfy_server: std::env::var("NTFY_SERVER")
                .unwrap_or_else(|_| DEFAULT_NTFY_SERVER.to_string()),
            ntfy_topic: std::env::var("NTFY_TOPIC")
                .unwrap_or_else(|_| DEFAULT_NTFY_TOPIC.to_string()),
        })
    }
}

/// Read a required environment variable.
fn require(name: &'static str) -> Result<String, SettingsError> {
    std::env::var(name).map_err(|_| SettingsError::MissingVar(name))
}

/// Read an optional pin-number variable, falling back to `default`.
fn pin_var(name: &'static str, default: u8) -> Result<u8, SettingsError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| SettingsError::InvalidVar(name, "a valid pin number")),
        Err(_) => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Environment variables are process-global, so all `from_env` cases
    /// run in a single test to avoid cross-test interference.
    #[test]
    fn from_env_covers_required_defaults_and_invalid() {
        // Missing required variable.
        std::env::remove_var("BOARD_ADDRESS");
        std::env::remove_var("BOARD_API_KEY");
        std::env::remove_var("BOARD_API_KEY_ID");
        let err = Settings::from_env().unwrap_err();
        assert_eq!(
            err.to_string(),
            "BOARD_ADDRESS environment variable is required"
        );

        // All required set, optionals defaulted.
        std::env::set_var("BOARD_ADDRESS", "ws://pi.local:9000");
        std::env::set_var("BOARD_API_KEY", "secret");
        std::env::set_var("BOARD_API_KEY_ID", "key-1");
        std::env::remove_var("SENSOR_PIN");
        std::env::remove_var("BUZZER_PIN");
        std::env::remove_var("NTFY_SERVER");
        std::env::remove_var("NTFY_TOPIC");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.board_address, "ws://pi.local:9000");
        assert_eq!(settings.sensor_pin, 8);
        assert_eq!(settings.buzzer_pin, 23);
        assert_eq!(settings.ntfy_server, "https://ntfy.sh");
        assert_eq!(settings.ntfy_topic, "home_alerts");

        // Optional overrides.
        std::env::set_var("SENSOR_PIN", "17");
        std::env::set_var("BUZZER_PIN", "24");
        std::env::set_var("NTFY_SERVER", "https://ntfy.example.com");
        std::env::set_var("NTFY_TOPIC", "basement");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.sensor_pin, 17);
        assert_eq!(settings.buzzer_pin, 24);
        assert_eq!(settings.ntfy_server, "https://ntfy.example.com");
        assert_eq!(settings.ntfy_topic, "basement");

        // Unparseable pin number.
        std::env::set_var("SENSOR_PIN", "not-a-pin");
        let err = Settings::from_env().unwrap_err();
        assert_eq!(err.to_string(), "SENSOR_PIN must be a valid pin number");

        std::env::remove_var("SENSOR_PIN");
        std::env::remove_var("BUZZER_PIN");
        std::env::remove_var("NTFY_SERVER");
        std::env::remove_var("NTFY_TOPIC");
    }
}
