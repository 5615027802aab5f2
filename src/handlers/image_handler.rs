use axum::extract::{Path, Query, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::word::{AttachImageRequest, SelectImageRequest};
use crate::services::unsplash_service::{self, MAX_CANDIDATES};
use crate::services::word_service;
use crate::AppState;

#[derive(Deserialize)]
pub struct ImageSearchQuery {
    pub term: Option<String>,
    pub count: Option<u32>,
}

fn required_term(term: Option<&str>) -> AppResult<&str> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("term is required".into()))
}

/// 1. Tự động gắn ảnh: lấy ảnh đầu tiên từ Unsplash và lưu cho mọi từ trùng `term`
pub async fn attach_image(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<AttachImageRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let term = required_term(payload.term.as_deref())?;
    tracing::info!(">>> Gắn ảnh cho từ: {}", term);

    let photo = unsplash_service::first_photo(&state.http, &state.config, term)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch image", e))?;

    let Some(photo) = photo else {
        tracing::warn!("--- Unsplash không có ảnh cho từ: {}", term);
        return Err(AppError::NotFound("No image found".into()));
    };

    let updated = word_service::set_image_by_term(&state.db, term, &photo.url).await?;

    tracing::info!("<<< Đã gắn ảnh cho {} bản ghi của từ {}", updated, term);
    Ok(Json(json!({
        "success": true,
        "imageUrl": photo.url,
        "updated": updated,
    })))
}

/// 2. Danh sách ảnh gợi ý để chọn thủ công (không lưu DB), cache một giờ
pub async fn search_images(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): WithRejection<Query<ImageSearchQuery>, AppError>,
) -> AppResult<Json<Value>> {
    let term = required_term(query.term.as_deref())?;
    let count = query.count.unwrap_or(MAX_CANDIDATES).clamp(1, MAX_CANDIDATES);

    if let Some(images) = state.image_cache.get(term, count).await {
        tracing::debug!("<<< Cache hit: {} ({} ảnh)", term, images.len());
        return Ok(Json(json!({ "success": true, "images": images })));
    }

    let images = unsplash_service::search_photos(&state.http, &state.config, term, count)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch images", e))?;

    state.image_cache.insert(term, count, images.clone()).await;
    tracing::debug!(
        "<<< {} ảnh cho {}, cache hiện có {} mục",
        images.len(),
        term,
        state.image_cache.len().await
    );

    Ok(Json(json!({ "success": true, "images": images })))
}

/// 3. Lưu ảnh người dùng đã chọn cho một từ cụ thể
pub async fn select_image(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<SelectImageRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let image_url = payload
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|u| u.starts_with("https://") || u.starts_with("http://"))
        .ok_or_else(|| AppError::BadRequest("imageUrl must be an http(s) URL".into()))?;

    let word = word_service::set_image_by_id(&state.db, id, image_url)
        .await?
        .ok_or_else(|| AppError::NotFound("Word not found".into()))?;

    tracing::info!("<<< Đã chọn ảnh cho từ {} (id={})", word.word, id);
    Ok(Json(json!({ "success": true, "word": word })))
}
