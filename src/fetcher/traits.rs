use crate::model::{AnalysisRequest, FetchError};

/// Source of raw historical-price JSON for a company.
#[async_trait::async_trait]
pub trait HistoricalDataSource: Send + Sync {
    async fn fetch(&self, req: &AnalysisRequest) -> Result<String, FetchError>;
}
