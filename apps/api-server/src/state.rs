//! Application state - shared across all handlers.

use std::sync::Arc;

use storefront_core::AuthService;
use storefront_core::ports::{PasswordService, TokenService, UserRepository};
use storefront_infra::{
    Argon2PasswordService, DatabaseConfig, InMemoryUserRepository, JwtTokenService,
    PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let users: Arc<dyn UserRepository> = match db_config {
            Some(config) => match config.connect().await {
                Ok(conn) => Arc::new(PostgresUserRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory store.",
                        e
                    );
                    Arc::new(InMemoryUserRepository::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with an in-memory user store.");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        Self::with_parts(users, Arc::new(Argon2PasswordService::new()), tokens)
    }

    /// Assemble state from explicit implementations (used by tests).
    pub fn with_parts(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(users, passwords, tokens.clone()));

        Self { auth, tokens }
    }
}
