//! The remote data source interface
//!
//! Views only ever talk to the crawl service through this trait, so tests and
//! alternative transports can stand in for the HTTP client.

use crate::model::{BrokenLink, Record, RecordId};
use crate::ApiResult;
use async_trait::async_trait;

/// Operations the dashboard consumes from the crawl service
#[async_trait]
pub trait CrawlApi: Send + Sync {
    // ===== Queries =====

    /// Lists every record (`GET /urls`)
    async fn list_records(&self) -> ApiResult<Vec<Record>>;

    /// Fetches one record (`GET /urls/{id}`)
    ///
    /// `broken_links` may come back as a count or as the embedded list.
    async fn get_record(&self, id: &RecordId) -> ApiResult<Record>;

    /// Fetches the broken links of one record (`GET /urls/{id}/broken`)
    async fn list_broken_links(&self, id: &RecordId) -> ApiResult<Vec<BrokenLink>>;

    // ===== Mutations =====

    /// Submits a URL for crawling (`POST /urls`)
    ///
    /// Returns the created record when the server echoes one back.
    async fn create_record(&self, url: &str) -> ApiResult<Option<Record>>;

    /// Deletes one record (`DELETE /urls/{id}`)
    async fn delete_record(&self, id: &RecordId) -> ApiResult<()>;

    /// Deletes several records (`POST /urls/bulk-delete`)
    async fn bulk_delete(&self, ids: &[RecordId]) -> ApiResult<()>;

    /// Re-runs analysis for several records (`POST /urls/bulk-restart`)
    async fn bulk_rerun(&self, ids: &[RecordId]) -> ApiResult<()>;

    /// Starts or re-runs one crawl (`PUT /urls/{id}/start`)
    async fn start(&self, id: &RecordId) -> ApiResult<()>;

    /// Stops one crawl (`PUT /urls/{id}/stop`)
    async fn stop(&self, id: &RecordId) -> ApiResult<()>;
}
