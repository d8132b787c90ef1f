//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::strategy::{AllocationError, PlanError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    /// Details stay in the server log; callers only see `message`.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::UnknownSecurity(_) => ApiError::NotFound("Security not found".to_string()),
            PlanError::PriceUnavailable(_)
            | PlanError::InvalidInput(AllocationError::NonPositivePrice { .. }) => {
                ApiError::NotFound("Unable to fetch stock prices".to_string())
            }
            PlanError::InvalidInput(
                e @ (AllocationError::NonPositiveInvestment(_) | AllocationError::Overflow(_)),
            ) => ApiError::Validation(e.to_string()),
            e @ PlanError::Provider { .. } => {
                ApiError::internal("Failed to fetch stock prices", e.into())
            }
        }
    }
}

/// Every unreadable request body is a 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, source } = &self {
            error!("{}: {:#}", message, source);
        }

        let body = Json(json!({
            "detail": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}
