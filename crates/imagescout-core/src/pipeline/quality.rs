//! Vision-model quality gate over one page of candidates.
//!
//! The gate is fail-open: a missing credential, a failed call, or output that
//! does not have the expected shape all count as a pass. Only an explicit
//! `"passed": false` from the model fails a page.

use super::json::extract_json_object;
use crate::llm::{LlmProvider, LlmRequest};
use crate::types::CandidateImage;
use serde_json::Value;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "你是一个严格的图片质量审核专家。请对照用户的中文描述，逐张检查提供的图片：
- 图片主题是否与描述一致
- 风格、情感、场景是否符合描述
- 图片本身的清晰度和构图质量

如果至少有一张图片能很好地满足描述，则审核通过。
否则审核不通过，并按匹配程度从高到低列出相对最好的图片编号（从1开始）。

只输出一行JSON，不要任何其他文字：
{\"passed\": true或false, \"reason\": \"简短原因\", \"best_images\": [编号]}";

/// Outcome of gating one page.
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Pass,
    Fail {
        reason: String,
        /// Re-ranked subset of the page, when the model named one
        best_subset: Option<Vec<CandidateImage>>,
    },
}

impl GateVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, GateVerdict::Pass)
    }
}

pub struct QualityGate {
    provider: Option<Arc<dyn LlmProvider>>,
    model: String,
    enabled: bool,
}

impl QualityGate {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, model: impl Into<String>, enabled: bool) -> Self {
        Self {
            provider,
            model: model.into(),
            enabled,
        }
    }

    /// Judge one page of candidates against the description.
    pub async fn evaluate(&self, description: &str, images: &[CandidateImage]) -> GateVerdict {
        if !self.enabled {
            return GateVerdict::Pass;
        }
        let Some(provider) = &self.provider else {
            tracing::warn!("Quality gate skipped: no model provider configured");
            return GateVerdict::Pass;
        };
        if images.is_empty() {
            return GateVerdict::Fail {
                reason: "no images to evaluate".into(),
                best_subset: None,
            };
        }

        let request = LlmRequest::new(
            &self.model,
            SYSTEM_PROMPT,
            format!(
                "用户描述：{description}\n\n请审核以下{}张图片（编号1-{}）：",
                images.len(),
                images.len()
            ),
        )
        .with_images(images.iter().map(|img| img.regular_url()))
        .with_max_tokens(500)
        .with_temperature(0.1);

        match provider.generate(&request).await {
            Ok(response) => {
                let verdict = parse_verdict(&response.text, images);
                match &verdict {
                    GateVerdict::Pass => tracing::info!("Quality gate passed"),
                    GateVerdict::Fail { reason, best_subset } => tracing::info!(
                        reason = %reason,
                        subset = best_subset.as_ref().map(Vec::len),
                        "Quality gate failed"
                    ),
                }
                verdict
            }
            Err(e) => {
                tracing::warn!("Quality gate call failed, accepting page: {e}");
                GateVerdict::Pass
            }
        }
    }
}

/// Interpret the model's verdict text for `images`.
pub(crate) fn parse_verdict(raw: &str, images: &[CandidateImage]) -> GateVerdict {
    let Some(value) = extract_json_object(raw) else {
        tracing::warn!("Quality gate reply is not JSON, accepting page");
        return GateVerdict::Pass;
    };

    match value.get("passed").and_then(Value::as_bool) {
        Some(false) => {}
        Some(true) => return GateVerdict::Pass,
        None => {
            tracing::warn!("Quality gate reply has no boolean 'passed', accepting page");
            return GateVerdict::Pass;
        }
    }

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let best_subset = match value.get("best_images") {
        None | Some(Value::Null) => None,
        Some(Value::Array(indices)) if indices.is_empty() => None,
        Some(Value::Array(indices)) => {
            let subset: Vec<CandidateImage> = indices
                .iter()
                .filter_map(Value::as_f64)
                .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= images.len() as f64)
                .map(|n| images[n as usize - 1].clone())
                .collect();
            if subset.is_empty() {
                Some(images.to_vec())
            } else {
                Some(subset)
            }
        }
        Some(_) => {
            tracing::warn!("Quality gate 'best_images' is not an array, accepting page");
            return GateVerdict::Pass;
        }
    };

    GateVerdict::Fail { reason, best_subset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_of, MockLlm};

    fn ids(images: &[CandidateImage]) -> Vec<&str> {
        images.iter().map(|img| img.id.as_str()).collect()
    }

    #[test]
    fn test_parse_passed_true() {
        let page = page_of("p", 3);
        assert_eq!(parse_verdict(r#"{"passed": true, "reason": "ok"}"#, &page), GateVerdict::Pass);
    }

    #[test]
    fn test_parse_failed_maps_one_based_indices() {
        let page = page_of("p", 5);
        let verdict = parse_verdict(r#"{"passed": false, "reason": "off", "best_images": [4, 2]}"#, &page);
        match verdict {
            GateVerdict::Fail { reason, best_subset } => {
                assert_eq!(reason, "off");
                assert_eq!(ids(&best_subset.unwrap()), vec!["p4", "p2"]);
            }
            GateVerdict::Pass => panic!("expected failure"),
        }
    }

    #[test]
    fn test_parse_failed_drops_out_of_range_indices() {
        let page = page_of("p", 3);
        let verdict = parse_verdict(r#"{"passed": false, "best_images": [0, 3, 9]}"#, &page);
        let GateVerdict::Fail { best_subset, .. } = verdict else {
            panic!("expected failure");
        };
        assert_eq!(ids(&best_subset.unwrap()), vec!["p3"]);
    }

    #[test]
    fn test_parse_failed_accepts_whole_number_floats() {
        let page = page_of("p", 5);
        let verdict = parse_verdict(r#"{"passed": false, "best_images": [2.0, 4.0, 3.5, "1"]}"#, &page);
        let GateVerdict::Fail { best_subset, .. } = verdict else {
            panic!("expected failure");
        };
        assert_eq!(ids(&best_subset.unwrap()), vec!["p2", "p4"]);
    }

    #[test]
    fn test_parse_failed_with_only_bad_indices_falls_back_to_page() {
        let page = page_of("p", 3);
        let verdict = parse_verdict(r#"{"passed": false, "best_images": [12, 40]}"#, &page);
        let GateVerdict::Fail { best_subset, .. } = verdict else {
            panic!("expected failure");
        };
        assert_eq!(best_subset.unwrap().len(), 3);
    }

    #[test]
    fn test_parse_failed_without_subset() {
        let page = page_of("p", 3);
        for raw in [
            r#"{"passed": false, "reason": "none fit"}"#,
            r#"{"passed": false, "best_images": []}"#,
            r#"{"passed": false, "best_images": null}"#,
        ] {
            assert!(matches!(
                parse_verdict(raw, &page),
                GateVerdict::Fail { best_subset: None, .. }
            ));
        }
    }

    #[test]
    fn test_parse_unexpected_shapes_pass() {
        let page = page_of("p", 3);
        for raw in [
            "looks fine to me",
            r#"{"reason": "missing flag"}"#,
            r#"{"passed": "no"}"#,
            r#"{"passed": false, "best_images": "2"}"#,
        ] {
            assert_eq!(parse_verdict(raw, &page), GateVerdict::Pass, "raw: {raw}");
        }
    }

    #[tokio::test]
    async fn test_sends_regular_urls_in_order() {
        let llm = MockLlm::replying(r#"{"passed": true}"#);
        let requests = llm.requests_handle();
        let gate = QualityGate::new(Some(Arc::new(llm)), "gpt-4o", true);
        let page = page_of("p", 4);

        assert!(gate.evaluate("海边日落", &page).await.passed());

        let requests = requests.lock().unwrap();
        let expected: Vec<String> = page.iter().map(|img| img.urls.regular.clone()).collect();
        assert_eq!(requests[0].image_urls, expected);
        assert!(requests[0].prompt.contains("海边日落"));
    }

    #[tokio::test]
    async fn test_fail_open_paths() {
        let page = page_of("p", 2);

        let no_provider = QualityGate::new(None, "gpt-4o", true);
        assert!(no_provider.evaluate("猫", &page).await.passed());

        let failing = QualityGate::new(Some(Arc::new(MockLlm::failing())), "gpt-4o", true);
        assert!(failing.evaluate("猫", &page).await.passed());
    }

    #[tokio::test]
    async fn test_disabled_gate_makes_no_calls() {
        let llm = MockLlm::replying(r#"{"passed": false}"#);
        let requests = llm.requests_handle();
        let gate = QualityGate::new(Some(Arc::new(llm)), "gpt-4o", false);

        assert!(gate.evaluate("猫", &page_of("p", 2)).await.passed());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_fails_without_call() {
        let llm = MockLlm::replying(r#"{"passed": true}"#);
        let requests = llm.requests_handle();
        let gate = QualityGate::new(Some(Arc::new(llm)), "gpt-4o", true);

        assert!(matches!(
            gate.evaluate("猫", &[]).await,
            GateVerdict::Fail { best_subset: None, .. }
        ));
        assert!(requests.lock().unwrap().is_empty());
    }
}
