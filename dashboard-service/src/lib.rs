pub mod classify;
pub mod config;
pub mod dashboard;
pub mod http_api;
pub mod metrics_server;
pub mod observability;
pub mod repository;

pub use dashboard::{get_usage_and_classification, UsagePanel, UsageSnapshot};
pub use repository::{RepositoryError, UsageCollections, UsageRepository};
