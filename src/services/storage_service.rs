//! Upload file lên Supabase Storage qua REST API.

use crate::config::Config;

/// Dung lượng avatar tối đa: 2 MiB.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Thư mục chứa avatar trong bucket.
pub const AVATAR_PREFIX: &str = "avatars";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Supabase storage is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Phần mở rộng file suy ra từ content type, ví dụ `image/jpeg` -> `jpg`.
pub fn extension_for(content_type: &str) -> String {
    let subtype = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match subtype.as_str() {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => {
            let cleaned: String = other.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            if cleaned.is_empty() {
                "img".to_string()
            } else {
                cleaned
            }
        }
    }
}

/// Tên object: `avatars/{user_id}-{timestamp}.{ext}`.
pub fn avatar_object_path(user_id: &str, content_type: &str, timestamp_millis: i64) -> String {
    let safe_user: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!(
        "{AVATAR_PREFIX}/{safe_user}-{timestamp_millis}.{}",
        extension_for(content_type)
    )
}

pub fn public_url(config: &Config, bucket: &str, path: &str) -> String {
    format!("{}/storage/v1/object/public/{bucket}/{path}", config.supabase_url)
}

/// Upload (cho phép ghi đè) và trả về URL công khai của object.
pub async fn upload_object(
    http: &reqwest::Client,
    config: &Config,
    bucket: &str,
    path: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, StorageError> {
    if config.supabase_url.is_empty() || config.supabase_service_role_key.is_empty() {
        return Err(StorageError::NotConfigured);
    }

    let response = http
        .post(format!(
            "{}/storage/v1/object/{bucket}/{path}",
            config.supabase_url
        ))
        .bearer_auth(&config.supabase_service_role_key)
        .header("apikey", &config.supabase_service_role_key)
        .header("x-upsert", "true")
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(bytes)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StorageError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(public_url(config, bucket, path))
}
