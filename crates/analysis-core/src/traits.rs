use async_trait::async_trait;
use crate::{AnalysisError, HistoryResponse, ProductRecord};

/// Contract for the external scraping collaborator. The engine never calls
/// a live implementation of this trait itself; it only consumes
/// already-materialized `ProductRecord`/`HistoryResponse` pairs.
#[async_trait]
pub trait IngestAdapter: Send + Sync {
    async fn fetch_products(&self, query: &str, max_pages: u32) -> Result<Vec<ProductRecord>, AnalysisError>;

    async fn fetch_history(&self, uuid: &str) -> Result<HistoryResponse, AnalysisError>;
}

/// Contract for the external persistence collaborator (hosted table store).
/// A single row's failure must be logged and skipped, never propagated to
/// abort the batch.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn upsert(&self, uuid: &str, payload: &serde_json::Value) -> Result<(), AnalysisError>;
}
