//! Core data types for the ImageScout search flow.
//!
//! `CandidateImage` mirrors the photo record returned by the search provider.
//! Everything else is a transient view built and discarded within one request.

use serde::{Deserialize, Serialize};

/// A single photo record as returned by the search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateImage {
    /// Provider-assigned photo id
    pub id: String,

    /// Image URLs at several resolutions
    pub urls: ImageUrls,

    /// Short accessibility caption
    #[serde(default)]
    pub alt_description: Option<String>,

    /// Free-text description written by the photographer
    #[serde(default)]
    pub description: Option<String>,

    /// Attribution
    pub user: Photographer,
}

impl CandidateImage {
    /// The URL handed to vision models and returned to clients.
    pub fn regular_url(&self) -> &str {
        &self.urls.regular
    }

    /// First non-empty caption: alt text, then long description.
    pub fn caption(&self) -> Option<&str> {
        [self.alt_description.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// Image URLs at the resolutions the provider offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub regular: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub thumb: String,
}

/// Photographer attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photographer {
    pub name: String,
}

/// Client-facing view of a candidate image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub photographer: String,
    pub is_best: bool,
}

/// Outcome of the multi-page search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Accepted candidates, in provider order
    pub images: Vec<CandidateImage>,
    /// Number of pages actually fetched
    pub total_pages: u32,
    /// Whether a page was accepted (by the gate or by force)
    pub quality_check_passed: bool,
}

/// Body of `POST /search-images`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /search-next-page`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextPageRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    /// Defaults to 2 when omitted
    #[serde(default)]
    pub page: Option<u32>,
}

/// Pagination details reported alongside the images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub total_pages: u32,
    pub quality_check_passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more_pages: Option<bool>,
}

/// Response body shared by both search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub original_description: String,
    /// The English keyword used for the photo search
    pub translation: String,
    pub images: Vec<ProcessedImage>,
    pub total_count: usize,
    /// 0-based index of the highlighted image, or -1 when there are none
    pub best_image_index: i32,
    pub search_info: SearchInfo,
}
