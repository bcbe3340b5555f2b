//! Chinese description to English search keyword.

use crate::error::{PipelineResult, SearchError, Upstream};
use crate::llm::{LlmProvider, LlmRequest};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "你是一个专业的图像搜索专家。你的任务是：
1. 首先分析用户的中文描述，理解用户想要什么样的图片（风格、主题、情感、场景等）
2. 然后基于这个理解，生成最适合图像搜索的英文关键词

关键词要求：
- 简洁准确，包含主要视觉元素
- 保留专有名词（地名、建筑、品牌、人物等），直接使用其通用英文名称
- 考虑图片的风格、主题、情感、场景、颜色等视觉修饰词
- 使用常见的图像搜索词汇
- 避免过于抽象的描述，专注于可视觉化的元素

只返回一个简短的英文关键词短语，不要其他解释。";

/// Extracts one English search phrase from a free-form description.
pub struct KeywordExtractor {
    provider: Option<Arc<dyn LlmProvider>>,
    model: String,
}

impl KeywordExtractor {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn extract(&self, description: &str) -> PipelineResult<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(SearchError::Validation("description must not be empty".into()));
        }

        let Some(provider) = &self.provider else {
            return Err(SearchError::NotConfigured {
                upstream: Upstream::Model,
                message: "OPENAI_API_KEY is not set".into(),
            });
        };

        let request = LlmRequest::new(
            &self.model,
            SYSTEM_PROMPT,
            format!("请分析以下中文描述并生成英文搜索关键词：{description}"),
        )
        .with_max_tokens(1500)
        .with_temperature(0.3);

        let response = provider.generate(&request).await?;
        let keyword = response.text.trim();
        if keyword.is_empty() {
            return Err(SearchError::model("keyword extraction returned empty text", None));
        }

        tracing::info!(keyword, latency_ms = response.latency_ms, "Extracted search keyword");
        Ok(keyword.to_string())
    }
}
