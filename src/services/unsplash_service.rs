//! Client cho Unsplash Search API (`GET /search/photos`).
//!
//! Chỉ lấy ảnh hướng vuông (`orientation=squarish`) để hiển thị đồng đều trên thẻ từ vựng.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Số ảnh tối đa cho một lần chọn ảnh thủ công.
pub const MAX_CANDIDATES: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageCandidate {
    pub url: String,
    pub thumb: String,
    pub alt: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UnsplashError {
    #[error("UNSPLASH_ACCESS_KEY is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unsplash API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
    alt_description: Option<String>,
    user: Option<PhotoUser>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
    small: String,
}

#[derive(Deserialize)]
struct PhotoUser {
    name: String,
}

impl From<Photo> for ImageCandidate {
    fn from(photo: Photo) -> Self {
        Self {
            url: photo.urls.regular,
            thumb: photo.urls.small,
            alt: photo.alt_description,
            author: photo.user.map(|u| u.name),
        }
    }
}

/// Tìm tối đa `per_page` ảnh cho `term`.
pub async fn search_photos(
    http: &reqwest::Client,
    config: &Config,
    term: &str,
    per_page: u32,
) -> Result<Vec<ImageCandidate>, UnsplashError> {
    if config.unsplash_access_key.is_empty() {
        return Err(UnsplashError::NotConfigured);
    }

    let per_page = per_page.to_string();
    let response = http
        .get(format!("{}/search/photos", config.unsplash_api_url))
        .header(
            reqwest::header::AUTHORIZATION,
            format!("Client-ID {}", config.unsplash_access_key),
        )
        .query(&[
            ("query", term),
            ("per_page", per_page.as_str()),
            ("orientation", "squarish"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UnsplashError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: SearchResponse = response.json().await?;
    Ok(parsed.results.into_iter().map(ImageCandidate::from).collect())
}

/// Ảnh đầu tiên cho `term`, dùng khi tự động gắn ảnh.
pub async fn first_photo(
    http: &reqwest::Client,
    config: &Config,
    term: &str,
) -> Result<Option<ImageCandidate>, UnsplashError> {
    Ok(search_photos(http, config, term, 1).await?.into_iter().next())
}
