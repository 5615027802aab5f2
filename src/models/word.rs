use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Các cột của bảng `words`, dùng chung cho mọi câu SELECT/RETURNING.
pub const WORD_COLUMNS: &str =
    "id, word, meaning, part_of_speech, example, pronunciation, image_url, topic_id";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub id: i32,
    pub word: String,
    pub meaning: String,
    pub part_of_speech: Option<String>,
    pub example: Option<String>,
    pub pronunciation: Option<String>, // phiên âm IPA
    pub image_url: Option<String>,
    pub topic_id: Option<i32>,
}

/// Tham số của `GET /api/words` và `GET /api/words/count`.
/// Giữ dạng chuỗi để tự kiểm tra (ví dụ `limit=all`).
#[derive(Debug, Default, Deserialize)]
pub struct WordListQuery {
    pub search: Option<String>,
    pub topic: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPage {
    pub success: bool,
    pub words: Vec<Word>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Deserialize)]
pub struct AttachImageRequest {
    pub term: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectImageRequest {
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub word: Option<String>,
    pub meaning: Option<String>,
    pub example: Option<String>,
    pub user_input: Option<String>,
}
