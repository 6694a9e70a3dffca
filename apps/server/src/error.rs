use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication failed")]
    Auth(AuthError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Auth(err) => return err.into_response(),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::Core(CoreError::ConstraintViolation(reason)) => {
                (StatusCode::BAD_REQUEST, reason)
            }
            ApiError::Core(e @ CoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Core(e @ CoreError::Database(DatabaseError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Core(e @ CoreError::MarketData(_)) => {
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            ApiError::Core(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            detail,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
