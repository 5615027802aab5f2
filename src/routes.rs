use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::avatar_handler::{self, AVATAR_BODY_LIMIT};
use crate::handlers::{
    health_handler, image_handler, pronunciation_handler, topic_handler, word_handler,
};
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS: cho phép mọi origin (frontend gọi trực tiếp từ trình duyệt)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler::health))

        // Từ vựng
        .route("/api/words", get(word_handler::list_words))
        .route("/api/words/count", get(word_handler::count_words))
        .route("/api/words/image", post(image_handler::attach_image))
        .route("/api/words/:id", get(word_handler::get_word))
        .route("/api/words/:id/image", put(image_handler::select_image))

        // Chủ đề
        .route("/api/topics", get(topic_handler::list_topics))
        .route("/api/topics/:id/words", get(topic_handler::list_topic_words))

        // Ảnh gợi ý (Unsplash)
        .route("/api/images/search", get(image_handler::search_images))

        // Luyện phát âm / đặt câu (Gemini)
        .route("/api/pronunciation/feedback", post(pronunciation_handler::feedback))

        // Avatar (Supabase Storage)
        .route(
            "/api/avatar",
            post(avatar_handler::upload_avatar).layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )

        // Middleware: log request và CORS
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
