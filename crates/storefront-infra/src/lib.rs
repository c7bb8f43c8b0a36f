//! # Storefront Infrastructure
//!
//! Concrete implementations of the ports defined in `storefront-core`:
//! SeaORM Postgres persistence, JWT tokens, Argon2 hashing and rate limiting.

pub mod auth;
pub mod database;
pub mod rate_limit;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryUserRepository, PostgresUserRepository};
pub use rate_limit::{IpRateLimiter, RateLimitConfig};
