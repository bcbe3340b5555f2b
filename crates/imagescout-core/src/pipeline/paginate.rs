//! Bounded multi-page search driven by the quality gate.

use super::quality::{GateVerdict, QualityGate};
use crate::error::{PipelineResult, SearchError, Upstream};
use crate::photos::PhotoSource;
use crate::types::SearchResult;
use std::sync::Arc;

/// Fetches pages until one passes the gate or `max_pages` is reached.
///
/// A failing page is discarded unless it is the last allowed one, in which
/// case the gate's subset (or the raw page) is accepted.
pub struct MultiPageSearch {
    photos: Option<Arc<dyn PhotoSource>>,
    gate: QualityGate,
    max_pages: u32,
}

impl MultiPageSearch {
    pub fn new(photos: Option<Arc<dyn PhotoSource>>, gate: QualityGate, max_pages: u32) -> Self {
        Self {
            photos,
            gate,
            max_pages: max_pages.max(1),
        }
    }

    pub async fn run(&self, description: &str, keyword: &str) -> PipelineResult<SearchResult> {
        let Some(photos) = &self.photos else {
            return Err(SearchError::NotConfigured {
                upstream: Upstream::Photos,
                message: "UNSPLASH_ACCESS_KEY is not set".into(),
            });
        };

        let mut page = 1;
        let mut images = Vec::new();
        let mut passed = false;

        while page <= self.max_pages && !passed {
            let batch = photos.search(keyword, page).await?;
            tracing::debug!(page, count = batch.len(), source = photos.name(), "Fetched page");
            if batch.is_empty() {
                break;
            }

            match self.gate.evaluate(description, &batch).await {
                GateVerdict::Pass => {
                    images = batch;
                    passed = true;
                }
                GateVerdict::Fail { .. } if page < self.max_pages => {
                    page += 1;
                }
                GateVerdict::Fail { best_subset, .. } => {
                    tracing::info!(page, "Last page failed the gate, accepting best candidates");
                    images = best_subset.unwrap_or(batch);
                    passed = true;
                }
            }
        }

        let total_pages = page.min(self.max_pages);
        tracing::info!(
            keyword,
            count = images.len(),
            total_pages,
            "Multi-page search finished"
        );

        Ok(SearchResult {
            images,
            total_pages,
            quality_check_passed: passed,
        })
    }
}
