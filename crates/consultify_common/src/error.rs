// --- File: crates/consultify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared across all Consultify crates.
///
/// Each crate keeps its own error enum and implements
/// `From<SpecificError> for CommonError` to map into this set.
#[derive(Error, Debug)]
pub enum CommonError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CommonError {
    fn status_code(&self) -> u16 {
        match self {
            CommonError::HttpError(_) => 500,
            CommonError::ParseError(_) => 400,
            CommonError::ConfigError(_) => 500,
            CommonError::ValidationError(_) => 422,
            CommonError::ExternalServiceError { .. } => 502,
            CommonError::ConflictError(_) => 409,
            CommonError::NotFoundError(_) => 404,
            CommonError::TimeoutError(_) => 504,
            CommonError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, CommonError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, CommonError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CommonError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CommonError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CommonError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CommonError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for CommonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CommonError::TimeoutError(err.to_string())
        } else {
            CommonError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CommonError {
    CommonError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CommonError {
    CommonError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CommonError {
    CommonError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> CommonError {
    CommonError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CommonError {
    CommonError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> CommonError {
    CommonError::InternalError(message.to_string())
}
