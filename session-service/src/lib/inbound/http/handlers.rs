use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::AuthError;
use crate::credential::errors::ValidationError;

pub mod login;
pub mod protected;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Message shared by every credential failure so responses do not reveal
/// whether the email is registered.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    InvalidCredentials,
    Conflict(String),
    Unauthorized { kind: &'static str, message: String },
    Forbidden(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "internal_error",
            ApiError::UnprocessableEntity(_) => "validation_error",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::Conflict(_) => "already_exists",
            ApiError::Unauthorized { kind, .. } => *kind,
            ApiError::Forbidden(_) => "invalid_token",
            ApiError::ServiceUnavailable(_) => "store_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match self {
            ApiError::InternalServerError(msg)
            | ApiError::UnprocessableEntity(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized { message: msg, .. }
            | ApiError::Forbidden(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, kind, message)),
        )
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => ApiError::from(e),
            AuthError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::NotFound(_) | AuthError::WrongPassword => ApiError::InvalidCredentials,
            AuthError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Credential store unavailable");
                ApiError::ServiceUnavailable("Credential store unavailable".to_string())
            }
            AuthError::CorruptCredential(_) | AuthError::Hashing(_) | AuthError::TokenIssue(_) => {
                tracing::error!(error = %err, "Authentication failed internally");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<auth::SessionError> for ApiError {
    fn from(err: auth::SessionError) -> Self {
        match err {
            auth::SessionError::Unauthenticated => ApiError::Unauthorized {
                kind: err.kind(),
                message: "Access denied. No token provided.".to_string(),
            },
            auth::SessionError::ExpiredToken => ApiError::Unauthorized {
                kind: err.kind(),
                message: "Token has expired".to_string(),
            },
            auth::SessionError::InvalidToken(_) => ApiError::Forbidden("Invalid token".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, kind: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                kind: kind.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let not_found = ApiError::from(AuthError::NotFound("a@x.com".to_string()));
        let wrong_password = ApiError::from(AuthError::WrongPassword);

        assert_eq!(not_found, wrong_password);
        assert_eq!(not_found.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_session_error_mapping() {
        let missing = ApiError::from(auth::SessionError::Unauthenticated);
        let expired = ApiError::from(auth::SessionError::ExpiredToken);
        let invalid = ApiError::from(auth::SessionError::InvalidToken("bad".to_string()));

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.kind(), "unauthenticated");
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.kind(), "expired_token");
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);
        assert_eq!(invalid.kind(), "invalid_token");
    }

    #[test]
    fn test_store_and_internal_errors_hide_details() {
        let unavailable = ApiError::from(AuthError::StoreUnavailable("pg down at 10.0.0.3".to_string()));
        let corrupt = ApiError::from(AuthError::CorruptCredential("bad phc".to_string()));

        assert_eq!(
            unavailable,
            ApiError::ServiceUnavailable("Credential store unavailable".to_string())
        );
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_and_duplicate_mapping() {
        let validation = ApiError::from(AuthError::Validation(ValidationError::EmptyPassword));
        let duplicate = ApiError::from(AuthError::AlreadyExists("a@x.com".to_string()));

        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(duplicate.kind(), "already_exists");
    }
}
