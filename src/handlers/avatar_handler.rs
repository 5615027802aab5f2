use axum::extract::{Multipart, State};
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::extract::WithRejection;
use axum_extra::TypedHeader;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::services::auth_service::{self, AuthError};
use crate::services::storage_service::{self, MAX_AVATAR_BYTES};
use crate::AppState;

/// Giới hạn body của route upload, lớn hơn `MAX_AVATAR_BYTES` để handler tự trả 400.
pub const AVATAR_BODY_LIMIT: usize = MAX_AVATAR_BYTES + 512 * 1024;

struct UploadedFile {
    content_type: String,
    bytes: Vec<u8>,
}

/// Kiểm tra file trước khi gửi lên storage: phải là ảnh và không quá 2 MiB.
fn validate_avatar(content_type: Option<&str>, size: usize) -> AppResult<()> {
    let is_image = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(AppError::BadRequest("File must be an image".into()));
    }
    if size > MAX_AVATAR_BYTES {
        return Err(AppError::BadRequest("File size must not exceed 2MB".into()));
    }
    Ok(())
}

/// Upload avatar: xác thực token -> kiểm tra file -> upload (ghi đè) -> trả URL công khai
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    WithRejection(mut multipart, _): WithRejection<Multipart, AppError>,
) -> AppResult<Json<Value>> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        tracing::warn!("--- Upload avatar thiếu token");
        return Err(AppError::Unauthorized("Unauthorized".into()));
    };

    let user = auth_service::authenticate(&state.http, &state.config, bearer.token())
        .await
        .map_err(|e| match e {
            AuthError::InvalidToken(reason) => {
                tracing::warn!("--- Token không hợp lệ: {}", reason);
                AppError::Unauthorized("Invalid token".into())
            }
            other => AppError::upstream("Failed to verify token", other),
        })?;

    tracing::info!(">>> Upload avatar: user={}, email={:?}", user.id, user.email);

    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some(UploadedFile {
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    validate_avatar(Some(&file.content_type), file.bytes.len())?;

    let path = storage_service::avatar_object_path(
        &user.id,
        &file.content_type,
        Utc::now().timestamp_millis(),
    );

    let url = storage_service::upload_object(
        &state.http,
        &state.config,
        &state.config.avatar_bucket,
        &path,
        &file.content_type,
        file.bytes,
    )
    .await
    .map_err(|e| AppError::upstream("Failed to upload avatar", e))?;

    tracing::info!("<<< Upload avatar thành công: user={}, path={}", user.id, path);
    Ok(Json(json!({ "success": true, "url": url })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_within_limit() {
        assert!(validate_avatar(Some("image/png"), 1024).is_ok());
        assert!(validate_avatar(Some("IMAGE/JPEG"), MAX_AVATAR_BYTES).is_ok());
    }

    #[test]
    fn rejects_non_images_and_oversized_files() {
        assert!(matches!(
            validate_avatar(Some("application/pdf"), 10),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(validate_avatar(None, 10), Err(AppError::BadRequest(_))));
        assert!(matches!(
            validate_avatar(Some("image/png"), MAX_AVATAR_BYTES + 1),
            Err(AppError::BadRequest(_))
        ));
    }
}
