//! Data Transfer Objects - request/response types of the auth API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use storefront_core::domain::User;

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub last_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
}

/// Request to rotate a refresh token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "This field is required"))]
    pub refresh_token: String,
}

/// A user's public profile, as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub email_verified: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
            email_verified: user.email_verified,
        }
    }
}

/// Response to register, login and refresh: the user plus a token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_bad_fields() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            first_name: String::new(),
            last_name: "Lovelace".into(),
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            email: "ada@example.com".into(),
            password: "hunter2hunter2".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        };

        assert!(req.validate().is_ok());
    }

    #[test]
    fn user_response_carries_no_password_material() {
        let user = User::register(
            "ada@example.com".into(),
            "$argon2id$fake".into(),
            "Ada".into(),
            "Lovelace".into(),
        );

        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"email_verified\":false"));
    }
}
