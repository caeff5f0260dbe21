//! Domain types and models

pub mod button;
pub mod catalog;
pub mod entry;
pub mod host;
pub mod visual;

pub use button::{ApiToken, Button, ButtonId, ButtonSettings, TrackingMode};
pub use catalog::{CatalogReply, PickerOption, Project, Task, Workspace};
pub use entry::{EntryScope, NewTimeEntry, RemoteEntry};
pub use host::{
    ActionPayload, HostCommand, HostEvent, InspectorRequest, Registration, StatePayload,
    TitlePayload, UrlPayload,
};
pub use visual::{ButtonState, ButtonVisual, MatchResult};
