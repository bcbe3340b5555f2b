//! ImageScout Core - AI-assisted stock photo search.
//!
//! Turns a Chinese description of a desired image into a ranked set of
//! Unsplash photos:
//!
//! ```text
//! Description → Keyword (LLM) → Search pages ⇄ Quality gate (vision) → Best pick (vision) → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use imagescout_core::{Config, ImageScout};
//!
//! #[tokio::main]
//! async fn main() -> imagescout_core::Result<()> {
//!     let config = Config::load()?;
//!     let scout = ImageScout::new(&config)?;
//!
//!     let response = scout.search("夕阳下的长城").await?;
//!     println!("Keyword: {}", response.translation);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod photos;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineResult, Result, ScoutError, SearchError, Upstream};
pub use llm::{LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
pub use output::OutputWriter;
pub use photos::{PhotoSource, UnsplashClient};
pub use pipeline::{BestImageSelector, GateVerdict, KeywordExtractor, MultiPageSearch, QualityGate};
pub use types::{
    CandidateImage, NextPageRequest, ProcessedImage, SearchInfo, SearchRequest, SearchResponse,
    SearchResult,
};

use pipeline::assemble_images;
use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capabilities advertised by the health check.
pub const FEATURES: &[&str] = &[
    "中文翻译",
    "图片搜索",
    "AI质量检查",
    "多页搜索",
    "最佳图片选择",
    "下一页搜索",
];

/// Page fetched by a next-page request that names none.
const DEFAULT_NEXT_PAGE: u32 = 2;

/// The search service: owns the providers and the pipeline stages.
///
/// Shared read-only across requests.
pub struct ImageScout {
    keywords: KeywordExtractor,
    search: MultiPageSearch,
    selector: BestImageSelector,
    photos: Option<Arc<dyn PhotoSource>>,
    model_configured: bool,
}

impl ImageScout {
    /// Build providers from configuration.
    ///
    /// Missing credentials are not an error here; requests that need the
    /// missing provider fail with [`SearchError::NotConfigured`].
    pub fn new(config: &Config) -> Result<Self> {
        tracing::debug!("Initializing ImageScout v{}", VERSION);
        let llm = LlmProviderFactory::create(config)?;
        let photos = UnsplashClient::from_config(config)
            .map(|client| Arc::new(client) as Arc<dyn PhotoSource>);
        Ok(Self::from_parts(llm, photos, config))
    }

    /// Assemble from already-built providers.
    pub fn from_parts(
        llm: Option<Arc<dyn LlmProvider>>,
        photos: Option<Arc<dyn PhotoSource>>,
        config: &Config,
    ) -> Self {
        let gate = QualityGate::new(
            llm.clone(),
            &config.llm.vision_model,
            config.search.quality_gate,
        );
        Self {
            keywords: KeywordExtractor::new(llm.clone(), &config.llm.keyword_model),
            search: MultiPageSearch::new(photos.clone(), gate, config.search.max_pages),
            selector: BestImageSelector::new(
                llm.clone(),
                &config.llm.vision_model,
                &config.llm.keyword_model,
            )
            .with_text_fallback(config.selector.text_fallback),
            model_configured: llm.is_some(),
            photos,
        }
    }

    pub fn model_configured(&self) -> bool {
        self.model_configured
    }

    pub fn photos_configured(&self) -> bool {
        self.photos.is_some()
    }

    pub fn features(&self) -> &'static [&'static str] {
        FEATURES
    }

    /// Full search: keyword extraction, gated multi-page search, selection.
    pub async fn search(&self, description: &str) -> PipelineResult<SearchResponse> {
        if description.trim().is_empty() {
            return Err(SearchError::Validation("请提供中文描述".into()));
        }
        tracing::info!(description, "Search request");

        let keyword = self.keywords.extract(description).await?;
        let result = self.search.run(description, &keyword).await?;
        let best = self.selector.select(description, &result.images).await;
        let images = assemble_images(&result.images, best, &keyword);

        Ok(SearchResponse {
            original_description: description.to_string(),
            translation: keyword,
            total_count: images.len(),
            images,
            best_image_index: best,
            search_info: SearchInfo {
                total_pages: result.total_pages,
                quality_check_passed: result.quality_check_passed,
                current_page: None,
                has_more_pages: None,
            },
        })
    }

    /// Fetch one specific page for known keywords, skipping the gate.
    pub async fn next_page(&self, request: &NextPageRequest) -> PipelineResult<SearchResponse> {
        let description = request.description.as_deref().map(str::trim).unwrap_or_default();
        let keywords = request.keywords.as_deref().map(str::trim).unwrap_or_default();
        if description.is_empty() || keywords.is_empty() {
            return Err(SearchError::Validation("请提供描述和关键词".into()));
        }
        let page = request.page.unwrap_or(DEFAULT_NEXT_PAGE);
        if page == 0 {
            return Err(SearchError::Validation("页码必须从1开始".into()));
        }

        let Some(photos) = &self.photos else {
            return Err(SearchError::NotConfigured {
                upstream: Upstream::Photos,
                message: "UNSPLASH_ACCESS_KEY is not set".into(),
            });
        };

        tracing::info!(keywords, page, "Next-page request");
        let batch = photos.search(keywords, page).await?;
        if batch.is_empty() {
            return Err(SearchError::PageExhausted {
                page,
                keywords: keywords.to_string(),
            });
        }

        let has_more_pages = batch.len() as u32 == photos.per_page();
        let best = self.selector.select(description, &batch).await;
        let images = assemble_images(&batch, best, keywords);

        Ok(SearchResponse {
            original_description: description.to_string(),
            translation: keywords.to_string(),
            total_count: images.len(),
            images,
            best_image_index: best,
            search_info: SearchInfo {
                total_pages: 1,
                quality_check_passed: false,
                current_page: Some(page),
                has_more_pages: Some(has_more_pages),
            },
        })
    }
}
