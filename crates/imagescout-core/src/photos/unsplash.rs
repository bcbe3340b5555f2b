//! Unsplash photo search client.
//!
//! Calls `GET /search/photos` with `Client-ID` authorization. Records are
//! deserialized straight into [`CandidateImage`]; unknown fields are ignored.

use super::source::PhotoSource;
use crate::config::Config;
use crate::error::{PipelineResult, SearchError};
use crate::types::CandidateImage;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Unsplash search API client.
pub struct UnsplashClient {
    access_key: String,
    endpoint: String,
    per_page: u32,
    orientation: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CandidateImage>,
}

impl UnsplashClient {
    pub fn new(access_key: &str, endpoint: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            per_page: 8,
            orientation: "landscape".to_string(),
            timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    /// Build from configuration. `None` when no access key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let Some(access_key) = config.photos_access_key() else {
            tracing::warn!("Unsplash access key not set. Set UNSPLASH_ACCESS_KEY env var.");
            return None;
        };
        Some(
            Self::new(&access_key, &config.photos.endpoint)
                .with_per_page(config.photos.per_page)
                .with_orientation(&config.photos.orientation)
                .with_timeout(Duration::from_millis(config.limits.photo_timeout_ms)),
        )
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_orientation(mut self, orientation: &str) -> Self {
        self.orientation = orientation.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn search(&self, keyword: &str, page: u32) -> PipelineResult<Vec<CandidateImage>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SearchError::Validation("search keyword must not be empty".into()));
        }
        if page == 0 {
            return Err(SearchError::Validation("page numbers start at 1".into()));
        }

        tracing::debug!(keyword, page, "Searching Unsplash");

        let resp = self
            .client
            .get(format!("{}/search/photos", self.endpoint))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", keyword.to_string()),
                ("page", page.to_string()),
                ("per_page", self.per_page.to_string()),
                ("orientation", self.orientation.clone()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SearchError::photos(format!("Unsplash request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SearchError::photos(
                format!("Unsplash HTTP {status}: {text}"),
                Some(status.as_u16()),
            ));
        }

        let data: SearchResponse = resp.json().await.map_err(|e| {
            SearchError::photos(format!("Failed to parse Unsplash response: {e}"), None)
        })?;

        Ok(data.results)
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Upstream;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn photo(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "urls": {
                "raw": format!("https://images.unsplash.com/{id}"),
                "regular": format!("https://images.unsplash.com/{id}?w=1080"),
                "small": format!("https://images.unsplash.com/{id}?w=400"),
                "thumb": format!("https://images.unsplash.com/{id}?w=200")
            },
            "alt_description": "mountain lake at dawn",
            "description": null,
            "user": {"name": "Ana"}
        })
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(header("Authorization", "Client-ID key-123"))
            .and(query_param("query", "mountain lake"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "8"))
            .and(query_param("orientation", "landscape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "total_pages": 1,
                "results": [photo("a1"), photo("b2")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = UnsplashClient::new("key-123", &server.uri());
        let images = client.search("  mountain lake ", 2).await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, "a1");
        assert_eq!(images[1].regular_url(), "https://images.unsplash.com/b2?w=1080");
    }

    #[tokio::test]
    async fn test_search_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let client = UnsplashClient::new("key", &server.uri());
        assert!(client.search("nothing", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_http_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("OAuth error"))
            .mount(&server)
            .await;

        let client = UnsplashClient::new("bad", &server.uri());
        match client.search("cat", 1).await.unwrap_err() {
            SearchError::Upstream {
                upstream,
                status_code,
                ..
            } => {
                assert_eq!(upstream, Upstream::Photos);
                assert_eq!(status_code, Some(401));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_rejects_blank_keyword_and_page_zero() {
        let client = UnsplashClient::new("key", "http://127.0.0.1:9");
        assert!(matches!(
            client.search("   ", 1).await,
            Err(SearchError::Validation(_))
        ));
        assert!(matches!(
            client.search("cat", 0).await,
            Err(SearchError::Validation(_))
        ));
    }

    #[test]
    fn test_from_config_requires_access_key() {
        let mut config = Config::default();
        config.photos.access_key = String::new();
        assert!(UnsplashClient::from_config(&config).is_none());

        config.photos.access_key = "key".to_string();
        config.photos.per_page = 12;
        let client = UnsplashClient::from_config(&config).unwrap();
        assert_eq!(client.per_page(), 12);
    }
}
