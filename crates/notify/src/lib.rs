//! Push notification delivery over ntfy.
//!
//! [`NtfyNotifier`] posts plain-text messages to an ntfy server
//! (`https://ntfy.sh` or self-hosted), addressing the topic through the
//! request path. It implements [`leakwatch_core::Messenger`] so the state
//! machine stays transport-agnostic.

pub mod ntfy;

pub use ntfy::{NtfyError, NtfyNotifier};
