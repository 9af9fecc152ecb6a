//! DTOs for registration, login, token refresh and link claiming.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{TokenPair, User};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login credentials.
///
/// Exactly one of `email` and `username` is read, depending on the
/// deployment's login identifier; the other is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub email: Option<String>,

    pub username: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClaimLinksRequest {
    #[validate(length(min = 1, message = "Anonymous ID is required"))]
    pub anonymous_id: String,
}

/// Account data plus a fresh token pair. The password hash is never included.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

impl AuthResponse {
    pub fn new(user: User, tokens: TokenPair, message: &str) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimLinksResponse {
    pub message: String,
    pub user_id: i64,
    pub claimed: u64,
}
