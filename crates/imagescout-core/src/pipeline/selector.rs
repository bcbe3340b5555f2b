//! Best-image selection.
//!
//! Never fails: any missing credential, failed call, or unreadable reply
//! falls back to the first candidate.

use super::json::extract_json_object;
use crate::llm::{LlmProvider, LlmRequest};
use crate::types::CandidateImage;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

const SYSTEM_PROMPT: &str = "你是一个专业的图像选择专家。请仔细查看用户提供的所有图片，并根据用户的中文描述选择最符合需求的一张。

在内部综合评估以下维度，但不要输出任何分析过程：
- 图片内容与描述主题的匹配度
- 风格和情感与描述的一致性
- 场景、构图和色彩是否符合描述
- 图片清晰度和整体视觉质量

输出要求（必须严格遵守）：
- 只输出一行JSON：{\"best_image_index\": X}
- X 是图片编号，从1开始
- 不要输出代码块标记、解释或任何其他文字";

const FALLBACK_SYSTEM_PROMPT: &str = "你是一个专业的图像选择专家。请根据用户的中文描述，从提供的图片列表中选择最符合描述的一张图片。只返回图片编号，不要其他解释。";

/// Picks the candidate that best matches a description.
pub struct BestImageSelector {
    provider: Option<Arc<dyn LlmProvider>>,
    vision_model: String,
    text_model: String,
    text_fallback: bool,
}

impl BestImageSelector {
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        vision_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            vision_model: vision_model.into(),
            text_model: text_model.into(),
            text_fallback: false,
        }
    }

    /// Retry with a caption-only prompt when the vision call fails.
    pub fn with_text_fallback(mut self, enabled: bool) -> Self {
        self.text_fallback = enabled;
        self
    }

    /// Zero-based index of the best image, or -1 when `images` is empty.
    pub async fn select(&self, description: &str, images: &[CandidateImage]) -> i32 {
        if images.is_empty() {
            return -1;
        }
        let Some(provider) = &self.provider else {
            tracing::warn!("No model provider configured, selecting the first image");
            return 0;
        };

        let count = images.len();
        let request = LlmRequest::new(
            &self.vision_model,
            SYSTEM_PROMPT,
            format!("用户描述：{description}\n\n请查看以下{count}张图片并选择最符合描述的图片编号（1-{count}）："),
        )
        .with_images(images.iter().map(|img| img.regular_url()))
        .with_max_tokens(1000)
        .with_temperature(0.1);

        match provider.generate(&request).await {
            Ok(response) => {
                let index = parse_best_index(&response.text, count);
                tracing::info!(index, count, "Selected best image");
                index as i32
            }
            Err(e) if self.text_fallback => {
                tracing::warn!("Vision selection failed, trying caption-only selection: {e}");
                self.select_by_caption(provider.as_ref(), description, images).await
            }
            Err(e) => {
                tracing::warn!("Vision selection failed, selecting the first image: {e}");
                0
            }
        }
    }

    async fn select_by_caption(
        &self,
        provider: &dyn LlmProvider,
        description: &str,
        images: &[CandidateImage],
    ) -> i32 {
        let listing = images
            .iter()
            .enumerate()
            .map(|(i, img)| format!("{}. {}", i + 1, img.caption().unwrap_or("无描述")))
            .collect::<Vec<_>>()
            .join("\n");

        let request = LlmRequest::new(
            &self.text_model,
            FALLBACK_SYSTEM_PROMPT,
            format!(
                "用户描述：{description}\n\n可选图片：\n{listing}\n\n请选择最符合描述的图片编号（1-{}）：",
                images.len()
            ),
        )
        .with_max_tokens(10)
        .with_temperature(0.1);

        match provider.generate(&request).await {
            Ok(response) => parse_best_index(&response.text, images.len()) as i32,
            Err(e) => {
                tracing::warn!("Caption-only selection failed, selecting the first image: {e}");
                0
            }
        }
    }
}

/// Turn a model reply into a zero-based index clamped to `[0, count - 1]`.
///
/// Prefers a JSON `best_image_index`, then the first number in the text,
/// then 0. Indices in the reply are 1-based.
pub(crate) fn parse_best_index(raw: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }

    let one_based = extract_json_object(raw)
        .and_then(|value| value.get("best_image_index").and_then(Value::as_f64))
        .map(|n| n.trunc())
        .or_else(|| {
            // ASCII digits only, so a parse failure can only be overflow.
            FIRST_NUMBER
                .find(raw)
                .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX) as f64)
        });

    match one_based {
        Some(n) if n >= 1.0 => ((n - 1.0).min((count - 1) as f64)) as usize,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::testing::{page_of, MockLlm};

    #[test]
    fn test_parse_json_index() {
        assert_eq!(parse_best_index(r#"{"best_image_index": 3}"#, 5), 2);
        assert_eq!(parse_best_index("```json\n{\"best_image_index\": 1}\n```", 5), 0);
    }

    #[test]
    fn test_parse_raw_number() {
        assert_eq!(parse_best_index("7", 5), 4);
        assert_eq!(parse_best_index("I pick image 2 because...", 5), 1);
    }

    #[test]
    fn test_parse_ignores_non_ascii_digits() {
        assert_eq!(parse_best_index("第３张", 8), 0);
        assert_eq!(parse_best_index("٣", 8), 0);
        assert_eq!(parse_best_index("第３张，备选1", 8), 0);
        assert_eq!(parse_best_index("第３张，备选4", 8), 3);
    }

    #[test]
    fn test_parse_non_numeric_json_index_uses_raw_number() {
        assert_eq!(parse_best_index(r#"{"best_image_index": "3"}"#, 5), 2);
        assert_eq!(parse_best_index(r#"{"best_image_index": null}"#, 5), 0);
    }

    #[test]
    fn test_parse_defaults_to_first() {
        assert_eq!(parse_best_index("", 5), 0);
        assert_eq!(parse_best_index("none of them", 5), 0);
        assert_eq!(parse_best_index(r#"{"best_image_index": 0}"#, 5), 0);
        assert_eq!(parse_best_index(r#"{"best_image_index": -4}"#, 5), 0);
    }

    #[test]
    fn test_parse_clamps_large_values() {
        assert_eq!(parse_best_index(r#"{"best_image_index": 99}"#, 8), 7);
        assert_eq!(parse_best_index("99999999999999999999999", 8), 7);
    }

    #[tokio::test]
    async fn test_empty_candidates_is_sentinel() {
        let llm = MockLlm::replying("1");
        let requests = llm.requests_handle();
        let selector = BestImageSelector::new(Some(Arc::new(llm)), "gpt-4o", "gpt-4o");

        assert_eq!(selector.select("猫", &[]).await, -1);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_select_sends_regular_urls() {
        let llm = MockLlm::replying(r#"{"best_image_index": 2}"#);
        let requests = llm.requests_handle();
        let selector = BestImageSelector::new(Some(Arc::new(llm)), "vision", "text");
        let page = page_of("p", 3);

        assert_eq!(selector.select("雪山", &page).await, 1);

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].model, "vision");
        let expected: Vec<String> = page.iter().map(|img| img.urls.regular.clone()).collect();
        assert_eq!(requests[0].image_urls, expected);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_selects_first() {
        let selector = BestImageSelector::new(Some(Arc::new(MockLlm::failing())), "v", "t");
        assert_eq!(selector.select("猫", &page_of("p", 4)).await, 0);

        let unconfigured = BestImageSelector::new(None, "v", "t");
        assert_eq!(unconfigured.select("猫", &page_of("p", 4)).await, 0);
    }

    #[tokio::test]
    async fn test_text_fallback_uses_captions() {
        let llm = MockLlm::new(|_, request| {
            if request.image_urls.is_empty() {
                Ok("3".to_string())
            } else {
                Err(SearchError::model("vision unavailable", Some(400)))
            }
        });
        let requests = llm.requests_handle();
        let selector =
            BestImageSelector::new(Some(Arc::new(llm)), "vision", "text").with_text_fallback(true);

        let mut page = page_of("p", 4);
        page[1].alt_description = None;
        assert_eq!(selector.select("猫", &page).await, 2);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].model, "text");
        assert!(requests[1].prompt.contains("1. photo p1"));
        assert!(requests[1].prompt.contains("2. 无描述"));
    }
}
