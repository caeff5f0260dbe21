//! # TogglDeck Domain
//!
//! Business domain types and models for TogglDeck.
//!
//! This crate contains:
//! - Button settings and the validated [`Button`] filter
//! - Remote time entry and catalog types (workspaces, projects, tasks)
//! - Host envelopes (inbound events, outbound commands)
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other TogglDeck crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
