//! Refresh bookkeeping and the loop that drives it

pub mod scheduler;
pub mod state;

pub use scheduler::{RefreshScheduler, SchedulerState};
pub use state::RefreshState;
