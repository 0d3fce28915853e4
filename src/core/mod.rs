//! Configuration and the data model shared by every function.

pub mod config;
pub mod events;
pub mod models;

pub use events::{EventKind, Scope, WebhookEvent};
pub use models::EnrichedResult;
