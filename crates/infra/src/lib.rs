//! # TogglDeck Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The Toggl Track HTTP adapter (`TimeTrackingService`)
//! - The host WebSocket bridge and its command outlet (`HostOutlet`)
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `toggldeck-core`
//! - Contains all "impure" code (network I/O, files, environment)

pub mod config;
pub mod errors;
pub mod host;
pub mod http;
pub mod logging;
pub mod toggl;

// Re-export commonly used items
pub use errors::InfraError;
pub use host::{command_channel, ChannelOutlet, HostBridge};
pub use http::HttpClient;
pub use logging::LoggingGuard;
pub use toggl::{ApiError, ApiErrorCategory, TogglClient};
