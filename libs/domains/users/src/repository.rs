use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::UserResult;
use crate::models::{UpdateSet, User};

/// Repository trait for user persistence
///
/// Email uniqueness is not enforced here: callers check with
/// [`count_by_email`](UserRepository::count_by_email) before
/// [`insert`](UserRepository::insert), and the two calls are not atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Number of records registered under `email`
    async fn count_by_email(&self, email: &str) -> UserResult<u64>;

    async fn insert(&self, user: &User) -> UserResult<()>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    async fn update_last_login_at(&self, id: ObjectId, at: DateTime<Utc>) -> UserResult<()>;

    /// Replace the stored password hash
    async fn update_password(&self, id: ObjectId, password_hash: &str) -> UserResult<()>;

    /// Apply `update` as a `$set` patch, returning the number of matched records
    async fn update_fields(&self, id: ObjectId, update: UpdateSet) -> UserResult<u64>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: ObjectId) -> UserResult<bool>;
}

/// Process-local repository for tests and local runs without MongoDB.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn count_by_email(&self, email: &str) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|user| user.email == email).count() as u64)
    }

    async fn insert(&self, user: &User) -> UserResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_last_login_at(&self, id: ObjectId, at: DateTime<Utc>) -> UserResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_password(&self, id: ObjectId, password_hash: &str) -> UserResult<()> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.password = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_fields(&self, id: ObjectId, update: UpdateSet) -> UserResult<u64> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(0);
        };

        *user = update.apply_to(user)?;
        Ok(1)
    }

    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}
