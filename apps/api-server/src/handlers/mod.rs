//! HTTP handlers and route configuration.

mod auth;
mod health;

use actix_web::web;
use std::sync::Arc;

use storefront_infra::IpRateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes under `/api/v1`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Arc<IpRateLimiter>) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .wrap(RateLimitMiddleware::new(limiter))
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/refresh", web::post().to(auth::refresh))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            ),
    );
}
