use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::auth::AuthError;
use crate::models::ApiResponse;
use crate::verification::RestrictionError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{}", .0.message)]
    Restricted(RestrictionError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_code(err, UNIQUE_VIOLATION)
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_code(err, FOREIGN_KEY_VIOLATION)
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

impl ApiError {
    /// Maps a unique violation to 409 with a resource-specific message.
    pub fn conflict_on_duplicate(err: sqlx::Error, message: &str) -> Self {
        if is_unique_violation(&err) {
            ApiError::Conflict(message.to_string())
        } else {
            ApiError::Database(err)
        }
    }

    /// Maps a foreign-key violation (a referenced row vanished) to 404.
    pub fn not_found_on_missing_reference(err: sqlx::Error, message: &str) -> Self {
        if is_foreign_key_violation(&err) {
            ApiError::NotFound(message.to_string())
        } else {
            ApiError::Database(err)
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::WrongActor => {
                ApiError::Forbidden(err.to_string())
            }
            AuthError::Hashing(_) | AuthError::Signing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::Restricted(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(err) if is_unique_violation(err) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (message, details) = match self {
            ApiError::Validation(errors) => {
                (self.to_string(), Some(Value::Array(validation_details(errors))))
            }
            ApiError::Restricted(restriction) => {
                (restriction.message.clone(), serde_json::to_value(restriction).ok())
            }
            ApiError::Database(sqlx::Error::RowNotFound) => ("Resource not found".to_string(), None),
            ApiError::Database(err) if is_unique_violation(err) => {
                ("Resource already exists".to_string(), None)
            }
            ApiError::Database(err) => {
                log::error!("Database error: {err:?}");
                ("Internal server error".to_string(), None)
            }
            ApiError::Internal(message) => {
                log::error!("Internal error: {message}");
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        HttpResponse::build(status).json(ApiResponse::<()>::error_with_details(message, details))
    }
}

/// Flattens nested validator errors into `{field, code, message}` entries.
pub fn validation_details(errors: &ValidationErrors) -> Vec<Value> {
    let mut details = Vec::new();
    collect_validation_details("", errors, &mut details);
    details.sort_by(|a, b| a["field"].as_str().cmp(&b["field"].as_str()));
    details
}

fn collect_validation_details(prefix: &str, errors: &ValidationErrors, out: &mut Vec<Value>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                    out.push(json!({
                        "field": path,
                        "code": error.code,
                        "message": message,
                    }));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_details(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommunityLink, UpdateCommunitySupportRequest, VerificationStatus};
    use crate::verification::restriction_for;
    use actix_web::body::to_bytes;
    use validator::Validate;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn validation_errors_list_nested_fields() {
        let request = UpdateCommunitySupportRequest {
            text: None,
            links: vec![CommunityLink {
                label: String::new(),
                url: "nope".into(),
            }],
        };
        let err = ApiError::from(request.validate().unwrap_err());
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"links[0].label"));
        assert!(fields.contains(&"links[0].url"));
    }

    #[actix_rt::test]
    async fn restriction_payload_is_returned_as_details() {
        let restriction = restriction_for(VerificationStatus::Suspended, None).unwrap();
        let (status, body) = body_json(ApiError::Restricted(restriction)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["details"]["code"], "ACCOUNT_SUSPENDED");
        assert_eq!(body["details"]["status"], "suspended");
    }

    #[actix_rt::test]
    async fn internal_errors_hide_their_cause() {
        let (status, body) = body_json(ApiError::Internal("pool exhausted".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::from(AuthError::MissingToken).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::WrongActor).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(AuthError::ExpiredToken).status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn only_key_violations_become_not_found() {
        let err = ApiError::not_found_on_missing_reference(sqlx::Error::PoolTimedOut, "Customer not found");
        assert!(matches!(err, ApiError::Database(sqlx::Error::PoolTimedOut)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
