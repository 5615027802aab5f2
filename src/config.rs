use std::fmt::Display;
use std::str::FromStr;

/// Cấu hình server, đọc từ biến môi trường (có hỗ trợ file `.env`).
///
/// | Biến môi trường             | Mặc định                                    |
/// |-----------------------------|---------------------------------------------|
/// | `DATABASE_URL`              | (bắt buộc)                                  |
/// | `HOST`                      | `127.0.0.1`                                 |
/// | `PORT`                      | `3000`                                      |
/// | `DB_MAX_CONNECTIONS`        | `5`                                         |
/// | `HTTP_TIMEOUT_SECS`         | `15`                                        |
/// | `UNSPLASH_ACCESS_KEY`       | rỗng                                        |
/// | `UNSPLASH_API_URL`          | `https://api.unsplash.com`                  |
/// | `GEMINI_API_KEY`            | rỗng                                        |
/// | `GEMINI_API_URL`            | `https://generativelanguage.googleapis.com` |
/// | `GEMINI_MODEL`              | `gemini-1.5-flash`                          |
/// | `SUPABASE_URL`              | rỗng                                        |
/// | `SUPABASE_ANON_KEY`         | rỗng                                        |
/// | `SUPABASE_SERVICE_ROLE_KEY` | rỗng                                        |
/// | `SUPABASE_JWT_SECRET`       | không có (xác thực qua Supabase Auth)       |
/// | `AVATAR_BUCKET`             | `avatars`                                   |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub http_timeout_secs: u64,

    pub unsplash_access_key: String,
    pub unsplash_api_url: String,

    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,

    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    /// Khi có secret thì token được kiểm tra ngay tại server (HS256).
    pub supabase_jwt_secret: Option<String>,
    pub avatar_bucket: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Đọc cấu hình qua một hàm tra cứu bất kỳ, dùng chung cho `from_env` và test.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host: text("HOST", "127.0.0.1"),
            port: parse_var(&lookup, "PORT", 3000)?,
            database_url,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            http_timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS", 15)?,

            unsplash_access_key: text("UNSPLASH_ACCESS_KEY", ""),
            unsplash_api_url: trim_slash(text("UNSPLASH_API_URL", "https://api.unsplash.com")),

            gemini_api_key: text("GEMINI_API_KEY", ""),
            gemini_api_url: trim_slash(text(
                "GEMINI_API_URL",
                "https://generativelanguage.googleapis.com",
            )),
            gemini_model: text("GEMINI_MODEL", "gemini-1.5-flash"),

            supabase_url: trim_slash(text("SUPABASE_URL", "")),
            supabase_anon_key: text("SUPABASE_ANON_KEY", ""),
            supabase_service_role_key: text("SUPABASE_SERVICE_ROLE_KEY", ""),
            supabase_jwt_secret: lookup("SUPABASE_JWT_SECRET").filter(|v| !v.trim().is_empty()),
            avatar_bucket: text("AVATAR_BUCKET", "avatars"),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: v.clone(),
            reason: e.to_string(),
        }),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/tuvung")]))
                .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.http_timeout_secs, 15);
        assert_eq!(config.unsplash_api_url, "https://api.unsplash.com");
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.avatar_bucket, "avatars");
        assert!(config.supabase_jwt_secret.is_none());
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/tuvung"),
            ("PORT", "abc"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn trailing_slashes_are_stripped_from_urls() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/tuvung"),
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_JWT_SECRET", "  "),
        ]))
        .unwrap();

        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert!(config.supabase_jwt_secret.is_none());
    }
}
