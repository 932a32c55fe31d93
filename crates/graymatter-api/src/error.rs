use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use graymatter_auth::error::AuthError;
use graymatter_core::error::CoreError;
use graymatter_storage::error::StorageError;
use graymatter_surveys::error::{AssemblyError, ScheduleError};
use serde::Serialize;

const GENERIC_INTERNAL: &str = "internal server error";

/// Unified API error type for all route handlers.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Log an infrastructure failure and hide its detail from the caller.
    pub fn internal(context: &str, e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "{context}");
        ApiError::Internal(GENERIC_INTERNAL.to_string())
    }

    pub fn missing_data() -> Self {
        ApiError::BadRequest("Missing data".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StorageError::Conflict { .. } | StorageError::AlreadyDone { .. } => {
                ApiError::Conflict(e.to_string())
            }
            StorageError::Invalid(core) => core.into(),
            other => ApiError::internal("storage failure", other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidDraft(_) | CoreError::InvalidLanguage(_) => {
                ApiError::BadRequest(e.to_string())
            }
            other => ApiError::internal("domain failure", other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthFailed(_) | AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                ApiError::Unauthorized(e.to_string())
            }
            other => ApiError::internal("auth failure", other),
        }
    }
}

impl From<AssemblyError> for ApiError {
    fn from(e: AssemblyError) -> Self {
        ApiError::internal("survey assembly failed", e)
    }
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::DateOutOfRange { .. } => ApiError::BadRequest(e.to_string()),
            other => ApiError::internal("scheduling failed", other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}
