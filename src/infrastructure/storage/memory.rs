//! In-memory user store
//!
//! Keyed lookup by numeric id. Created users are retained for the lifetime
//! of the process and ids are never reused.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::seed::seed_users;
use crate::domain::{DomainResult, NewUser, User, UserRepository};

pub struct InMemoryUserStore {
    users: DashMap<u64, User>,
    id_counter: AtomicU64,
}

impl InMemoryUserStore {
    /// Store pre-populated with the seed users.
    pub fn new() -> Self {
        Self::with_users(seed_users())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let map = DashMap::new();
        for user in users {
            map.insert(user.id, user);
        }

        Self {
            users: map,
            id_counter: AtomicU64::new(next_id),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn list(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|r| r.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let Ok(id) = id.parse::<u64>() else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let user = new_user.with_id(id);
        self.users.insert(id, user.clone());
        debug!(user_id = id, "User stored");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser::new(name, format!("{}@example.com", name.to_lowercase()), None).unwrap()
    }

    #[tokio::test]
    async fn looks_up_any_seeded_id() {
        let store = InMemoryUserStore::new();
        assert_eq!(store.find_by_id("2").await.unwrap().unwrap().name, "Bob");
        assert_eq!(store.find_by_id("3").await.unwrap().unwrap().name, "Charlie");
        assert!(store.find_by_id("42").await.unwrap().is_none());
        assert!(store.find_by_id("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn created_users_are_retained_in_id_order() {
        let store = InMemoryUserStore::new();
        let dave = store.insert(new_user("Dave")).await.unwrap();
        let erin = store.insert(new_user("Erin")).await.unwrap();

        assert_eq!(dave.id, 4);
        assert_eq!(erin.id, 5);

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
        assert_eq!(store.find_by_id("5").await.unwrap().unwrap().name, "Erin");
    }

    #[tokio::test]
    async fn empty_store_starts_at_one() {
        let store = InMemoryUserStore::with_users(Vec::new());
        let user = store.insert(new_user("First")).await.unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let store = Arc::new(InMemoryUserStore::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.insert(new_user(&format!("U{}", i))).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.list().await.unwrap().len(), 19);
    }
}
