use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// One violated validation rule, reported per field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Which unique column collided, when known from the pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
    /// Insert-time constraint violation; the store does not say which
    /// column collided.
    Unknown,
}

impl DuplicateField {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateField::Username => "Username already registered",
            DuplicateField::Email => "Email already registered",
            DuplicateField::Unknown => "Username or email already exists",
        }
    }
}

/// Failures surfaced by the data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username or email already exists")]
    Duplicate,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Everything that can go wrong during registration.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{}", .0.message())]
    Duplicate(DuplicateField),
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
    #[error("storage failure")]
    Store(#[source] sqlx::Error),
}

impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => RegisterError::Duplicate(DuplicateField::Unknown),
            StoreError::Database(e) => RegisterError::Store(e),
        }
    }
}

impl From<sqlx::Error> for RegisterError {
    fn from(err: sqlx::Error) -> Self {
        RegisterError::Store(err)
    }
}

impl RegisterError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegisterError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RegisterError::Duplicate(_) => StatusCode::BAD_REQUEST,
            RegisterError::Hash(_) | RegisterError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RegisterError::Validation(errors) => json!({ "detail": errors }),
            RegisterError::Duplicate(field) => json!({ "detail": field.message() }),
            RegisterError::Hash(_) | RegisterError::Store(_) => {
                json!({ "detail": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422_with_field_detail() {
        let err = RegisterError::Validation(vec![FieldError {
            field: "username",
            message: "must be between 3 and 50 characters",
        }]);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn duplicate_username_maps_to_400_naming_username() {
        let err = RegisterError::Duplicate(DuplicateField::Username);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Username"));
    }

    #[test]
    fn race_duplicate_is_generic() {
        let err: RegisterError = StoreError::Duplicate.into();
        match err {
            RegisterError::Duplicate(DuplicateField::Unknown) => {}
            other => panic!("expected generic duplicate, got {:?}", other),
        }
        assert_eq!(
            DuplicateField::Unknown.message(),
            "Username or email already exists"
        );
    }

    #[test]
    fn database_error_maps_to_500() {
        let err: RegisterError = StoreError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
