use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, instrument};

use crate::state::AppState;
use crate::users::dto::{CreateUser, UserView};
use crate::users::error::RegisterError;
use crate::users::services;

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/", post(create_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserView>), RegisterError> {
    let user = services::register(&state.db, payload).await.map_err(|e| {
        match &e {
            RegisterError::Store(source) => error!(error = %source, "user creation failed"),
            RegisterError::Hash(source) => error!(error = %source, "hash_password failed"),
            _ => {}
        }
        e
    })?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}
