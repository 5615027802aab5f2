use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Lỗi chung cho mọi handler.
///
/// Body trả về luôn có dạng `{ "error": "..." }`. Lỗi 5xx được ghi log đầy đủ
/// ở server, client chỉ nhận thông báo chung.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Request không qua được extractor (query, path, JSON, multipart).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Dịch vụ bên ngoài (Unsplash, Gemini, Supabase) trả lỗi.
    /// `message` là nội dung gửi cho client, `detail` chỉ để ghi log.
    #[error("{message}: {detail}")]
    Upstream {
        message: &'static str,
        detail: String,
    },
}

pub type AppResult<T> = Result<T, AppError>;

// Lỗi từ extractor của axum (query/path/JSON/multipart sai định dạng): giữ mã
// trạng thái gốc (400, 415...) nhưng body đổi sang dạng `{error}`.
macro_rules! from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(QueryRejection, PathRejection, JsonRejection, MultipartRejection);

impl AppError {
    pub fn upstream(message: &'static str, detail: impl ToString) -> Self {
        AppError::Upstream {
            message,
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected { status, .. } => *status,
            AppError::Database(_) | AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::Rejected { message, .. } => {
                tracing::warn!("--- Request bị từ chối: {}", message);
                message.clone()
            }
            AppError::Database(e) => {
                tracing::error!("!!! Database error: {}", e);
                "Database query failed".to_string()
            }
            AppError::Upstream { message, detail } => {
                tracing::error!("!!! Upstream error: {} ({})", message, detail);
                message.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_of(AppError::NotFound("No image found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "No image found" }));

        let (status, _) = body_of(AppError::BadRequest("term is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = body_of(AppError::Unauthorized("Unauthorized".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn extractor_rejections_keep_status_and_use_json_body() {
        use axum::extract::rejection::MissingJsonContentType;

        let rejection = JsonRejection::from(MissingJsonContentType::default());
        let (status, body) = body_of(AppError::from(rejection)).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database query failed");

        let (status, body) =
            body_of(AppError::upstream("Failed to fetch images", "connection refused")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch images");
    }
}
