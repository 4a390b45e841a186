//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::CreateUser;
use crate::domain::User;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and email are required";

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// `admin`, `user`, or the label given on create
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
}

/// Create user request
///
/// `name` and `email` must be present and non-empty. `role` defaults to
/// `user` when absent or empty and is otherwise echoed unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "Name and email are required"),
        length(min = 1, message = "Name and email are required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Name and email are required"),
        length(min = 1, message = "Name and email are required")
    )]
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            name: r.name.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            role: r.role,
        }
    }
}
