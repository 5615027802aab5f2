use axum::extract::{Path, Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::word::{WordListQuery, WordPage};
use crate::services::word_service::{self, Pagination, WordFilter};
use crate::AppState;

/// 1. Danh sách từ vựng: tìm kiếm, lọc theo chủ đề, phân trang
pub async fn list_words(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): WithRejection<Query<WordListQuery>, AppError>,
) -> AppResult<Json<WordPage>> {
    let filter = WordFilter::parse(query.search.as_deref(), query.topic.as_deref())?;
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref())?;

    tracing::debug!(
        ">>> list words: search={:?}, topic={:?}, page={}, limit={}",
        query.search,
        filter.topic_id,
        pagination.page,
        pagination.limit
    );

    let (words, total) = word_service::list_words(&state.db, &filter, pagination).await?;

    tracing::debug!("<<< list words: {} of {}", words.len(), total);
    Ok(Json(WordPage {
        success: true,
        words,
        total,
        page: pagination.page,
        limit: pagination.limit,
        total_pages: pagination.total_pages(total),
    }))
}

/// 2. Đếm số từ khớp bộ lọc, không phụ thuộc phân trang
pub async fn count_words(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): WithRejection<Query<WordListQuery>, AppError>,
) -> AppResult<Json<Value>> {
    let filter = WordFilter::parse(query.search.as_deref(), query.topic.as_deref())?;
    let count = word_service::count_words(&state.db, &filter).await?;

    Ok(Json(json!({ "success": true, "count": count })))
}

/// 3. Chi tiết một từ
pub async fn get_word(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Value>> {
    let word = word_service::find_word(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Word not found".into()))?;

    Ok(Json(json!({ "success": true, "word": word })))
}
