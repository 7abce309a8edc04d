//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the single error type returned by every handler.
//! Each variant maps to exactly one HTTP status code, and the JSON body is always
//! `{"error": <message>}`.
//!
//! Internal failures (store outages, hashing or signing problems) are logged with
//! their full detail but reach the client only as a generic message, so driver
//! errors never leak over the wire.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message sent to clients for every internal failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    ValidationError(String),
    /// The resource already exists, e.g. a duplicate email at signup (HTTP 409).
    Conflict(String),
    /// Missing, invalid or expired token, or bad credentials (HTTP 401).
    Unauthorized(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    /// The carried detail is logged, never returned to the client.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.as_str(),
            AppError::InternalServerError(detail) => {
                log::error!("{}", detail);
                INTERNAL_ERROR_MESSAGE
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The message lists the offending fields in a stable order, e.g.
/// `"Invalid fields: email, password"`.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        AppError::ValidationError(format!("Invalid fields: {}", fields.join(", ")))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("bcrypt failure: {}", error))
    }
}

/// Duplicate keys become conflicts; everything else from the store is internal.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateKey(_) => AppError::Conflict("User already exists".into()),
            StoreError::Backend(detail) => {
                AppError::InternalServerError(format!("store failure: {}", detail))
            }
        }
    }
}
