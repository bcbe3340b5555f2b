//! Test doubles for the provider traits.

use crate::error::{PipelineResult, SearchError};
use crate::llm::{LlmProvider, LlmRequest, LlmResponse};
use crate::photos::PhotoSource;
use crate::types::{CandidateImage, ImageUrls, Photographer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Reply = Box<dyn Fn(u32, &LlmRequest) -> PipelineResult<String> + Send + Sync>;

/// Scripted model provider that records every request it receives.
pub(crate) struct MockLlm {
    reply: Reply,
    pub(crate) requests: Arc<Mutex<Vec<LlmRequest>>>,
}

impl MockLlm {
    pub(crate) fn new<F>(reply: F) -> Self
    where
        F: Fn(u32, &LlmRequest) -> PipelineResult<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `text`.
    pub(crate) fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Answers with `replies` in order, repeating the last one.
    pub(crate) fn scripted(replies: &[&str]) -> Self {
        let replies: Vec<String> = replies.iter().map(|r| r.to_string()).collect();
        Self::new(move |idx, _| {
            let idx = (idx as usize).min(replies.len() - 1);
            Ok(replies[idx].clone())
        })
    }

    /// Every call fails with an upstream error.
    pub(crate) fn failing() -> Self {
        Self::new(|_, _| Err(SearchError::model("connection refused", None)))
    }

    pub(crate) fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &LlmRequest) -> PipelineResult<LlmResponse> {
        let idx = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            (requests.len() - 1) as u32
        };
        let text = (self.reply)(idx, request)?;
        Ok(LlmResponse {
            text: text.trim().to_string(),
            model: request.model.clone(),
            tokens_used: None,
            latency_ms: 1,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}

/// In-memory photo source keyed by page number.
pub(crate) struct MockPhotos {
    pages: HashMap<u32, Vec<CandidateImage>>,
    per_page: u32,
    pub(crate) calls: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockPhotos {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
            per_page: 8,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_page(mut self, page: u32, images: Vec<CandidateImage>) -> Self {
        self.pages.insert(page, images);
        self
    }

    pub(crate) fn calls_handle(&self) -> Arc<Mutex<Vec<(String, u32)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl PhotoSource for MockPhotos {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, keyword: &str, page: u32) -> PipelineResult<Vec<CandidateImage>> {
        self.calls.lock().unwrap().push((keyword.to_string(), page));
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }
}

/// A candidate whose id and URLs are derived from `id`.
pub(crate) fn candidate(id: &str) -> CandidateImage {
    CandidateImage {
        id: id.to_string(),
        urls: ImageUrls {
            regular: format!("https://images.example/{id}?w=1080"),
            small: format!("https://images.example/{id}?w=400"),
            thumb: format!("https://images.example/{id}?w=200"),
        },
        alt_description: Some(format!("photo {id}")),
        description: None,
        user: Photographer {
            name: format!("author-{id}"),
        },
    }
}

/// A page of `count` candidates with ids `{prefix}1..={prefix}{count}`.
pub(crate) fn page_of(prefix: &str, count: usize) -> Vec<CandidateImage> {
    (1..=count).map(|i| candidate(&format!("{prefix}{i}"))).collect()
}
