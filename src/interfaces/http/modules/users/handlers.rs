//! User API handlers
//!
//! Delegate to `UserService`; errors map through `ApiError`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, UserDto, UserListResponse};
use crate::application::UserService;
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedPayload};

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = UserListResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state.user_service.get_user(&id).await?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body(
        content = CreateUserRequest,
        content_type = "application/json",
        description = "Also accepted as application/x-www-form-urlencoded"
    ),
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Name or email missing", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedPayload(request): ValidatedPayload<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state.user_service.create_user(request.into()).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}
