//! Xác thực access token do Supabase Auth cấp.
//!
//! Nếu có `SUPABASE_JWT_SECRET` thì token được kiểm tra chữ ký ngay tại server,
//! ngược lại hỏi Supabase qua `GET /auth/v1/user`.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::config::Config;
use crate::models::user::{AuthUser, Claims};

/// Audience mà Supabase gán cho người dùng đã đăng nhập.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("Supabase auth is not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Auth API error ({status}): {body}")]
    Api { status: u16, body: String },
}

pub async fn authenticate(
    http: &reqwest::Client,
    config: &Config,
    token: &str,
) -> Result<AuthUser, AuthError> {
    match config.supabase_jwt_secret.as_deref() {
        Some(secret) => verify_local(secret, token),
        None => fetch_user(http, config, token).await,
    }
}

pub fn verify_local(secret: &str, token: &str) -> Result<AuthUser, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AuthUser {
        id: data.claims.sub,
        email: data.claims.email,
    })
}

async fn fetch_user(
    http: &reqwest::Client,
    config: &Config,
    token: &str,
) -> Result<AuthUser, AuthError> {
    if config.supabase_url.is_empty() || config.supabase_anon_key.is_empty() {
        return Err(AuthError::NotConfigured);
    }

    let response = http
        .get(format!("{}/auth/v1/user", config.supabase_url))
        .bearer_auth(token)
        .header("apikey", &config.supabase_anon_key)
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(AuthError::InvalidToken(format!("auth provider returned {status}")));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<AuthUser>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sign_token, TEST_JWT_SECRET};
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn valid_token_yields_user() {
        let token = sign_token("user-123", 3600);
        let user = verify_local(TEST_JWT_SECRET, &token).unwrap();
        assert_eq!(user.id, "user-123");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token("user-123", 3600);
        assert!(matches!(
            verify_local("another-secret", &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_token("user-123", -3600);
        assert!(matches!(
            verify_local(TEST_JWT_SECRET, &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn anon_audience_is_rejected() {
        let claims = Claims {
            sub: "user-123".into(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            aud: "anon".into(),
            email: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_local(TEST_JWT_SECRET, &token).is_err());
    }
}
