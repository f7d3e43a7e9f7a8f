//! Core of the Telegram media-group relay.
//!
//! This crate is intentionally framework-agnostic. The HTTP surface (axum) and
//! the Bot API client (reqwest) live in adapter crates and meet the core at
//! the `MediaGroupSender` port.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod media;
pub mod ports;
pub mod relay;

pub use errors::{Error, Result};
