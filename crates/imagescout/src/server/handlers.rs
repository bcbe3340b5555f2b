//! Route handlers.

use super::error::ApiError;
use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use imagescout_core::{NextPageRequest, SearchRequest, SearchResponse, FEATURES};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub features: &'static [&'static str],
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "AI图像搜索器服务运行正常",
        features: FEATURES,
    })
}

pub async fn search_images(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body?;
    let description = request.description.unwrap_or_default();
    let response = state.scout.search(&description).await?;
    tracing::info!(
        keyword = %response.translation,
        count = response.total_count,
        best = response.best_image_index,
        "Search completed"
    );
    Ok(Json(response))
}

pub async fn search_next_page(
    State(state): State<AppState>,
    body: Result<Json<NextPageRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body?;
    let response = state.scout.next_page(&request).await?;
    tracing::info!(
        keyword = %response.translation,
        page = response.search_info.current_page,
        count = response.total_count,
        "Next-page search completed"
    );
    Ok(Json(response))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
