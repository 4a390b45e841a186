use async_trait::async_trait;

use super::{NewUser, User};
use crate::domain::DomainResult;

/// Storage capability behind the user routes.
///
/// `find_by_id` receives the identifier exactly as it appeared in the
/// request path; each store decides how to match it.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<User>>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn insert(&self, new_user: NewUser) -> DomainResult<User>;
}
