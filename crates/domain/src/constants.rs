//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Remote service
pub const DEFAULT_API_BASE_URL: &str = "https://api.track.toggl.com/api/v9";
pub const DEFAULT_CREATED_WITH: &str = "Stream Deck";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_MAX_ATTEMPTS: usize = 3;
pub const PROJECTS_PER_PAGE: u32 = 200;
pub const MAX_PROJECT_PAGES: u32 = 100;

// Refresh cadence
pub const DEFAULT_POLL_FREQUENCY_SECS: u64 = 600;
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

// Presentation
pub const STATE_ACTIVE: u8 = 0;
pub const STATE_INACTIVE: u8 = 1;
pub const TITLE_SEPARATOR: &str = "\n\n\n";
pub const UNNAMED_ENTRY_LABEL: &str = "Other Task";
pub const ARCHIVED_PROJECT_SUFFIX: &str = " (Archived)";
pub const DONE_TASK_SUFFIX: &str = " (Done)";
