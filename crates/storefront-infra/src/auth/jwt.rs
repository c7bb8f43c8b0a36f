//! JWT token service - independent access and refresh signing keys.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::ports::{AuthError, TokenClaims, TokenService};

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: "change-me-in-production".to_string(),
            refresh_secret: "change-me-too-in-production".to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 7 * 24 * 3600,
            issuer: "storefront-api".to_string(),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    email: String,
    role: String,
    exp: i64,
    iat: i64,
    iss: String,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl KeyPair {
    fn from_secret(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

/// JWT-based token service.
///
/// The access and refresh sides use separate secrets, so a refresh token can
/// never authenticate a request and an access token is useless for refresh.
pub struct JwtTokenService {
    access: KeyPair,
    refresh: KeyPair,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            access: KeyPair::from_secret(&config.access_secret, config.access_ttl_secs),
            refresh: KeyPair::from_secret(&config.refresh_secret, config.refresh_ttl_secs),
            issuer: config.issuer,
        }
    }

    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();

        let access_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| defaults.access_secret.clone());
        let refresh_secret =
            std::env::var("JWT_REFRESH_SECRET").unwrap_or_else(|_| defaults.refresh_secret.clone());

        if access_secret == defaults.access_secret || refresh_secret == defaults.refresh_secret {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secrets in production! Set JWT_SECRET and JWT_REFRESH_SECRET."
                );
            } else {
                tracing::warn!("Using default JWT secrets. Set JWT_SECRET and JWT_REFRESH_SECRET.");
            }
        }

        let config = JwtConfig {
            access_secret,
            refresh_secret,
            access_ttl_secs: std::env::var("JWT_ACCESS_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.access_ttl_secs),
            refresh_ttl_secs: std::env::var("JWT_REFRESH_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refresh_ttl_secs),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };
        Self::new(config)
    }

    fn generate(
        &self,
        keys: &KeyPair,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::seconds(keys.ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate(&self, keys: &KeyPair, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: token_data.claims.email,
            role: token_data.claims.role,
            exp: token_data.claims.exp,
        })
    }
}

impl TokenService for JwtTokenService {
    fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        self.generate(&self.access, user_id, email, role)
    }

    fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        self.generate(&self.refresh, user_id, email, role)
    }

    fn validate_access_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate(&self.access, token)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate(&self.refresh, token)
    }
}
