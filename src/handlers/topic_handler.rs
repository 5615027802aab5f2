use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::topic::TopicWithCount;
use crate::services::word_service;
use crate::AppState;

/// 1. Danh sách chủ đề kèm số từ thuộc mỗi chủ đề
pub async fn list_topics(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let topics = sqlx::query_as::<_, TopicWithCount>(
        r#"
        SELECT t.id, t.name, t.description, COUNT(w.id) AS word_count
        FROM topics t
        LEFT JOIN words w ON w.topic_id = t.id
        GROUP BY t.id, t.name, t.description
        ORDER BY t.name ASC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("<<< Đã lấy {} chủ đề", topics.len());
    Ok(Json(json!({ "success": true, "topics": topics })))
}

/// 2. Các từ thuộc một chủ đề, theo thứ tự chữ cái
pub async fn list_topic_words(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Value>> {
    let words = word_service::words_by_topic(&state.db, id).await?;

    tracing::debug!("<<< Chủ đề {} có {} từ", id, words.len());
    Ok(Json(json!({ "success": true, "words": words })))
}
