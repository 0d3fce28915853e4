//! All Slack-specific functionality

pub mod message_builder;
pub mod webhook;

// Re-export main types for convenience
pub use message_builder::{
    Attachment, AttachmentColor, AttachmentField, MessageBuilder, SlackPayload,
};
pub use webhook::post_to_slack;
