//! `leakwatch-agent` -- leak monitor daemon.
//!
//! Watches a leak sensor pin through the board gateway, sounds the buzzer
//! and pushes an ntfy notification when the line goes wet, and clears both
//! when it dries out again. The alarm is edge-triggered: a sustained level
//! produces each side effect exactly once.
//!
//! # Environment variables
//!
//! | Variable           | Required | Default           | Description                                      |
//! |--------------------|----------|-------------------|--------------------------------------------------|
//! | `BOARD_ADDRESS`    | yes      | --                | Gateway WebSocket URL, e.g. `ws://pi.local:9000` |
//! | `BOARD_API_KEY`    | yes      | --                | Gateway API key secret                           |
//! | `BOARD_API_KEY_ID` | yes      | --                | ID of the gateway API key                        |
//! | `SENSOR_PIN`       | no       | `8`               | GPIO pin of the leak sensor                      |
//! | `BUZZER_PIN`       | no       | `23`              | GPIO pin of the buzzer                           |
//! | `NTFY_SERVER`      | no       | `https://ntfy.sh` | ntfy server base URL                             |
//! | `NTFY_TOPIC`       | no       | `home_alerts`     | Default notification topic                       |

use leakwatch_agent::settings::Settings;

use leakwatch_board::{BoardClient, Buzzer};
use leakwatch_core::LeakStateMachine;
use leakwatch_notify::NtfyNotifier;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "leakwatch_agent=info,leakwatch_core=info,leakwatch_board=info,leakwatch_notify=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        board = %settings.board_address,
        sensor_pin = settings.sensor_pin,
        buzzer_pin = settings.buzzer_pin,
        ntfy_server = %settings.ntfy_server,
        ntfy_topic = %settings.ntfy_topic,
        "Starting leakwatch-agent",
    );

    // --- Board gateway ---
    let client = BoardClient::new(
        settings.board_address.clone(),
        settings.board_api_key.clone(),
        settings.board_api_key_id.clone(),
    );
    let mut session = match client.connect().await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Board gateway connection failed");
            std::process::exit(1);
        }
    };

    // --- Initial sensor level ---
    let initial = match session.read_level(settings.sensor_pin).await {
        Ok(high) => high,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read initial sensor level");
            std::process::exit(1);
        }
    };
    tracing::info!(pin = settings.sensor_pin, high = initial, "Initial sensor level");

    // --- Watch subscription ---
    if let Err(e) = session.watch_pins(&[settings.sensor_pin]).await {
        tracing::error!(error = %e, "Failed to watch sensor pin");
        std::process::exit(1);
    }

    // --- Wiring ---
    let (commander, mut ticks) = session.into_parts(settings.sensor_pin);
    let buzzer = Buzzer::new(commander, settings.buzzer_pin);
    let notifier = NtfyNotifier::new(settings.ntfy_server.clone(), settings.ntfy_topic.clone());
    let mut machine = LeakStateMachine::new(buzzer, notifier);

    // A line that is already wet at boot raises the alarm right away; the
    // edge trigger keeps it to a single activation.
    machine.process_level(initial).await;

    // --- Run until shutdown ---
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    machine.run(&mut ticks, cancel).await;

    tracing::info!("Leak monitor stopped");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the daemon stops
/// cleanly whether interrupted interactively or by a process manager
/// (e.g. systemd, Docker).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
