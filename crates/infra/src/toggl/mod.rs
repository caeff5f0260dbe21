//! Toggl Track v9 adapter

pub mod auth;
pub mod client;
pub mod errors;

pub use client::TogglClient;
pub use errors::{ApiError, ApiErrorCategory};
