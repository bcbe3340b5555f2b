//! HTTP error responses.
//!
//! Every error leaves the server as `{"error": "<message>"}`. Messages are
//! user-facing and stay in Chinese; the underlying cause goes to the log.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use imagescout_core::{SearchError, Upstream};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("route not found")]
    NotFound,
    #[error("internal error")]
    Internal,
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("请求体必须是有效的JSON".to_string())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "接口不存在".to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "服务器内部错误".to_string(),
            ),
            ApiError::Search(e) => match e {
                SearchError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                SearchError::NotConfigured {
                    upstream: Upstream::Model,
                    ..
                } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OpenAI API 配置错误，请检查 API 密钥".to_string(),
                ),
                SearchError::NotConfigured {
                    upstream: Upstream::Photos,
                    ..
                } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unsplash API 配置错误，请检查 Access Key".to_string(),
                ),
                SearchError::Upstream { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "搜索图片时发生错误，请稍后重试".to_string(),
                ),
                SearchError::PageExhausted { page, .. } => (
                    StatusCode::NOT_FOUND,
                    format!("第{page}页没有更多图片了"),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
