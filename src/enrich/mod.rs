//! Webhook payload enrichment: follow the event's resource URL through the
//! platform API and collect the related resources.

pub mod enricher;
pub mod event_url;
pub mod resources;
pub mod run_stats;

pub use enricher::Enricher;
pub use event_url::EventUrl;
