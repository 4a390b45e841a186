//! User service
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository, UserRole};

/// Input for creating a user. `role` is the raw label from the request.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list().await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    /// Create a user. An empty role counts as absent and becomes `user`;
    /// any other label is stored as given.
    pub async fn create_user(&self, input: CreateUser) -> DomainResult<User> {
        let role = input
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(UserRole::from);

        let new_user = NewUser::new(input.name, input.email, role)?;
        let user = self.repo.insert(new_user).await?;
        info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }
}
