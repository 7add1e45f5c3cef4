use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    state::AppState,
    users::{
        dto::{
            CreateUserRequest, CreatedUserResponse, UpdateUserRequest, UpdatedUserResponse,
            UserResponse,
        },
        error::{UserError, UserResult},
        extractors::JsonBody,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// Ids that are not UUIDs cannot name a stored user.
fn parse_id(raw: &str) -> UserResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(id = %raw, "malformed user id");
        UserError::NotFound
    })
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let id = parse_id(&id)?;
    let user = state.users.get_by_id(id).await?.ok_or(UserError::NotFound)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> UserResult<Json<Vec<UserResponse>>> {
    let users = state.users.get_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> UserResult<(StatusCode, Json<CreatedUserResponse>)> {
    let input = payload.into_new_user().map_err(|e| {
        warn!("create user with missing fields");
        e
    })?;
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> UserResult<Json<UpdatedUserResponse>> {
    let id = parse_id(&id)?;
    let user = state.users.update(id, payload.into()).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> UserResult<StatusCode> {
    let id = parse_id(&id)?;
    if state.users.delete(id).await? {
        info!(user_id = %id, "delete ok");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(UserError::NotFound)
    }
}
