use serde::{Deserialize, Serialize};

/// Người dùng đã xác thực qua Supabase Auth.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Claims trong access token do Supabase cấp.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub aud: String,
    pub email: Option<String>,
}
