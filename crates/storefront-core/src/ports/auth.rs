//! Authentication ports.

use uuid::Uuid;

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

/// Token service for the access/refresh token pair.
///
/// Access and refresh tokens are signed with independent secrets; a token
/// issued by one side must never validate on the other.
pub trait TokenService: Send + Sync {
    /// Issue a short-lived access token.
    fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, AuthError>;

    /// Issue a long-lived refresh token.
    fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, AuthError>;

    /// Validate and decode an access token.
    fn validate_access_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Validate and decode a refresh token.
    fn validate_refresh_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
