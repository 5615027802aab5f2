//! Gọi Gemini `generateContent` để nhận xét câu luyện tập của học viên.

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

/// Thông báo lỗi chung gửi cho client khi không nhận được phản hồi từ AI.
pub const FEEDBACK_ERROR_MESSAGE: &str = "Không thể nhận phản hồi từ AI. Vui lòng thử lại sau.";

/// Giới hạn độ dài nhận xét (số từ) yêu cầu trong prompt.
pub const FEEDBACK_WORD_BUDGET: u32 = 150;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Gemini response contained no text")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Chỉ dùng phần text đầu tiên của candidate đầu tiên.
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

pub fn build_feedback_prompt(word: &str, meaning: &str, example: &str, user_input: &str) -> String {
    format!(
        "Bạn là một giáo viên tiếng Anh thân thiện, đang giúp học viên người Việt luyện tập từ vựng.\n\
         Từ vựng: \"{word}\"\n\
         Nghĩa: \"{meaning}\"\n\
         Câu ví dụ: \"{example}\"\n\
         Câu học viên đã nói/viết: \"{user_input}\"\n\n\
         Hãy nhận xét bằng tiếng Việt, tối đa {FEEDBACK_WORD_BUDGET} từ:\n\
         1. Học viên đã dùng từ \"{word}\" đúng nghĩa và đúng ngữ cảnh chưa.\n\
         2. Lỗi ngữ pháp hoặc cách diễn đạt (nếu có).\n\
         3. Gợi ý một câu hoàn chỉnh hơn.\n\
         Giữ giọng văn khích lệ, ngắn gọn."
    )
}

pub async fn generate_feedback(
    http: &reqwest::Client,
    config: &Config,
    prompt: &str,
) -> Result<String, GeminiError> {
    if config.gemini_api_key.is_empty() {
        return Err(GeminiError::NotConfigured);
    }

    let body = json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ]
    });

    let response = http
        .post(format!(
            "{}/v1beta/models/{}:generateContent",
            config.gemini_api_url, config.gemini_model
        ))
        .query(&[("key", config.gemini_api_key.as_str())])
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GeminiError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: GenerateResponse = response.json().await?;
    parsed.first_text().ok_or(GeminiError::EmptyResponse)
}
