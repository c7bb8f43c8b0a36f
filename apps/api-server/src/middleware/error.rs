//! Error handling - every failure is rendered as an `ApiResponse` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use storefront_core::DomainError;
use storefront_core::ports::AuthError;
use storefront_shared::response::{
    ApiResponse, CODE_EMAIL_EXISTS, CODE_FORBIDDEN, CODE_INTERNAL_ERROR,
    CODE_INVALID_CREDENTIALS, CODE_INVALID_REQUEST, CODE_INVALID_TOKEN, CODE_UNAUTHORIZED,
    CODE_USER_NOT_FOUND, FieldError,
};

/// Application-level error type that converts to envelope responses.
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Validation(Vec<FieldError>),
    EmailExists,
    InvalidCredentials,
    InvalidToken,
    Unauthorized,
    Forbidden,
    UserNotFound,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed ({} fields)", errors.len()),
            AppError::EmailExists => write!(f, "Email already exists"),
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::InvalidToken => write!(f, "Invalid or expired token"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::UserNotFound => write!(f, "User not found"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmailExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InvalidRequest(msg) => {
                ApiResponse::error(CODE_INVALID_REQUEST, msg.clone())
            }
            AppError::Validation(errors) => ApiResponse::validation_error(errors.clone()),
            AppError::EmailExists => {
                ApiResponse::error(CODE_EMAIL_EXISTS, "Email already exists")
            }
            AppError::InvalidCredentials => {
                ApiResponse::error(CODE_INVALID_CREDENTIALS, "Invalid email or password")
            }
            AppError::InvalidToken => {
                ApiResponse::error(CODE_INVALID_TOKEN, "Invalid or expired refresh token")
            }
            AppError::Unauthorized => {
                ApiResponse::error(CODE_UNAUTHORIZED, "User not authenticated")
            }
            AppError::Forbidden => ApiResponse::error(CODE_FORBIDDEN, "Insufficient permissions"),
            AppError::UserNotFound => ApiResponse::error(CODE_USER_NOT_FOUND, "User not found"),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ApiResponse::error(CODE_INTERNAL_ERROR, "Something went wrong")
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::EmailExists => AppError::EmailExists,
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::InvalidToken => AppError::InvalidToken,
            DomainError::UserNotFound { .. } => AppError::UserNotFound,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => AppError::Forbidden,
            AuthError::HashingError(msg) => AppError::Internal(msg),
            // Missing, expired and malformed tokens all read the same to the
            // caller of a protected route.
            _ => AppError::Unauthorized,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation(details)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// JSON deserialization failures become `INVALID_REQUEST` envelopes instead
/// of actix's default plain-text 400.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::InvalidRequest(format!("Invalid request body: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::EmailExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn validation_errors_become_field_details() {
        let probe = Probe {
            email: "nope".into(),
        };

        let err: AppError = probe.validate().unwrap_err().into();
        match err {
            AppError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "email");
                assert_eq!(details[0].message, "Invalid email format");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn domain_errors_map_onto_app_errors() {
        assert!(matches!(
            AppError::from(DomainError::EmailExists),
            AppError::EmailExists
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidToken),
            AppError::InvalidToken
        ));
    }
}
