//! Photo source trait.

use crate::error::PipelineResult;
use crate::types::CandidateImage;
use async_trait::async_trait;

/// A paginated keyword search over a stock-photo catalogue.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Source name for logging (e.g., "unsplash").
    fn name(&self) -> &str;

    /// Fetch one page of results (1-based). An empty vec means no more results.
    async fn search(&self, keyword: &str, page: u32) -> PipelineResult<Vec<CandidateImage>>;

    /// Results requested per page. A full page suggests more pages exist.
    fn per_page(&self) -> u32;
}
