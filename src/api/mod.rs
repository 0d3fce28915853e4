//! Lambda handlers, one per function, and request processing

pub mod destination_handler;
pub mod helpers;
pub mod parsing;
pub mod slack_handler;
pub mod usage_log_handler;
