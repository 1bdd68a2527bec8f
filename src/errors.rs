use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::payment::{GatewayKind, PaymentField};

pub const INVALID_REQUEST_MESSAGE: &str = "The request is invalid";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const PROCESSOR_FAILED_MESSAGE: &str = "Internal server error: PaymentProcessor Failed";

/// A single field that failed its business rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} rejected: {reason}")]
pub struct FieldRejection {
    pub field: PaymentField,
    pub reason: String,
}

impl FieldRejection {
    pub fn new(field: PaymentField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    InvalidField(#[from] FieldRejection),

    #[error("Malformed submission: {0}")]
    MalformedForm(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Payment processor failed: {gateway} gave up after {attempts} attempt(s)")]
    PaymentProcessorFailed { gateway: GatewayKind, attempts: u32 },
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::MalformedForm(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidField(_) | Self::MalformedForm(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) | Self::PaymentProcessorFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the body sent to the caller. It never names the rejected field.
    pub fn response_message(&self) -> &'static str {
        match self {
            Self::InvalidField(_) | Self::MalformedForm(_) => INVALID_REQUEST_MESSAGE,
            Self::InternalError(_) => INTERNAL_ERROR_MESSAGE,
            Self::PaymentProcessorFailed { .. } => PROCESSOR_FAILED_MESSAGE,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.response_message()).into_response()
    }
}
