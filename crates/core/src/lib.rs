//! # TogglDeck Core
//!
//! Button reconciliation logic with no I/O of its own.
//!
//! This crate contains:
//! - Port interfaces for the time tracking service, the host and the clock
//! - The entry matcher and the button registry
//! - The reconciliation engine, its refresh scheduler and the event
//!   dispatcher that drives both
//!
//! ## Architecture Principles
//! - Only depends on `toggldeck-domain`
//! - All HTTP and host traffic goes through traits implemented in
//!   `toggldeck-infra`

pub mod catalog;
pub mod dispatch;
pub mod engine;
pub mod matching;
pub mod ports;
pub mod presentation;
pub mod refresh;
pub mod registry;

pub use catalog::SettingsCatalog;
pub use dispatch::EventDispatcher;
pub use engine::{EngineOptions, ReconciliationEngine};
pub use ports::{Clock, HostOutlet, SystemClock, TimeTrackingService};
pub use refresh::{RefreshScheduler, RefreshState, SchedulerState};
pub use registry::ButtonRegistry;
