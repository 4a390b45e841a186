//! User directory routes

pub mod dto;
pub mod handlers;

pub use dto::{CreateUserRequest, UserDto, UserListResponse};
pub use handlers::*;
