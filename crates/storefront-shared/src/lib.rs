//! # Storefront Shared
//!
//! Wire types shared between the backend and its clients: the response
//! envelope and the request/response DTOs of the auth API.

pub mod dto;
pub mod response;

pub use response::{ApiError, ApiResponse, FieldError};
