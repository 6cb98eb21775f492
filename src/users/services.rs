use sqlx::PgPool;
use tracing::{info, warn};

use crate::users::dto::CreateUser;
use crate::users::error::{DuplicateField, RegisterError};
use crate::users::password::hash_password;
use crate::users::repo_types::User;

/// Register a new user: validate, pre-check for duplicates, hash the
/// password, insert.
///
/// The pre-check lookups only exist to name the conflicting field in the
/// error message; the unique constraints enforced by `User::create` are
/// what actually prevent two concurrent registrations from both
/// succeeding. A duplicate is terminal for the request, never retried.
pub async fn register(db: &PgPool, body: CreateUser) -> Result<User, RegisterError> {
    if let Err(violations) = body.validate() {
        warn!(fields = ?violations.iter().map(|e| e.field).collect::<Vec<_>>(), "registration input invalid");
        return Err(RegisterError::Validation(violations));
    }

    if User::find_by_username(db, &body.username).await?.is_some() {
        warn!(username = %body.username, "username already registered");
        return Err(RegisterError::Duplicate(DuplicateField::Username));
    }
    if User::find_by_email(db, &body.email).await?.is_some() {
        warn!(email = %body.email, "email already registered");
        return Err(RegisterError::Duplicate(DuplicateField::Email));
    }

    let hash = hash_password(&body.password).map_err(RegisterError::Hash)?;

    let user = User::create(db, &body.username, &body.email, &hash).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}
