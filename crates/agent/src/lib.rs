//! `leakwatch-agent` library crate.
//!
//! Exposes the daemon's modules so the binary entrypoint in `main.rs`
//! stays a thin bootstrap.

pub mod settings;
