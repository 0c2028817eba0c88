pub mod memory;
pub mod usage_document_queries;

pub use memory::MemoryCollection;
pub use usage_document_queries::PgUsageCollection;

use anyhow::Result;

/// A document collection answering point lookups keyed by date string and
/// household id.
#[async_trait::async_trait]
pub trait UsageCollection: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Return the first document stored under `(date, home_id)`, if any.
    async fn find_one(&self, date: &str, home_id: &str) -> Result<Option<serde_json::Value>>;
}
