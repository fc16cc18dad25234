use super::wire::ErrorResponse;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use battle_application::RegistryError;
use battle_domain::DomainError;

/// Handler errors mapped onto HTTP status codes
#[derive(Debug)]
pub enum ApiError {
    /// Rejected request, 422
    Validation(String),
    /// Unknown session, 404
    NotFound,
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

/// Unparseable bodies (missing fields, wrong types) get the same `detail`
/// shape as every other validation failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Validation(inner) => inner.into(),
            RegistryError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Debate session not found".to_string(),
            ),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
