use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::word::FeedbackRequest;
use crate::services::gemini_service::{self, FEEDBACK_ERROR_MESSAGE};
use crate::AppState;

/// Nhận xét câu luyện tập của học viên bằng Gemini.
/// Nội dung trả về là text đầu tiên của model, giữ nguyên.
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<FeedbackRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let word = payload.word.as_deref().map(str::trim).unwrap_or_default();
    let user_input = payload.user_input.as_deref().map(str::trim).unwrap_or_default();
    if word.is_empty() || user_input.is_empty() {
        return Err(AppError::BadRequest("word and userInput are required".into()));
    }

    tracing::info!(">>> Nhận xét luyện tập cho từ: {}", word);

    let prompt = gemini_service::build_feedback_prompt(
        word,
        payload.meaning.as_deref().unwrap_or_default(),
        payload.example.as_deref().unwrap_or_default(),
        user_input,
    );

    let feedback = gemini_service::generate_feedback(&state.http, &state.config, &prompt)
        .await
        .map_err(|e| AppError::upstream(FEEDBACK_ERROR_MESSAGE, e))?;

    Ok(Json(json!({ "success": true, "feedback": feedback })))
}
