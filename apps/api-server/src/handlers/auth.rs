//! Authentication handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use storefront_core::NewUser;
use storefront_core::domain::User;
use storefront_core::service::TokenPair;
use storefront_shared::ApiResponse;
use storefront_shared::dto::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(user: &User, tokens: TokenPair) -> AuthResponse {
    AuthResponse {
        user: UserResponse::from(user),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let (user, tokens) = state
        .auth
        .register(NewUser {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        auth_response(&user, tokens),
        "User registered successfully",
    )))
}

/// POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let (user, tokens) = state.auth.login(&req.email, &req.password).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        auth_response(&user, tokens),
        "Login successful",
    )))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshTokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let (user, tokens) = state.auth.refresh(&req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        auth_response(&user, tokens),
        "Token refreshed successfully",
    )))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; logout is an acknowledgement and the client discards
/// its pair.
pub async fn logout() -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logout successful")))
}

/// GET /api/v1/auth/me - protected route.
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.auth.current_user(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse::from(&user))))
}
