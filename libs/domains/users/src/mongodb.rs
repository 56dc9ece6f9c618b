//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId, to_bson},
};
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{UpdateSet, User};
use crate::repository::UserRepository;

/// Default collection name
pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(&client.database("user_service"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<User>(collection_name);
        Self { collection }
    }

    /// Create the lookup index on `email`.
    ///
    /// The index is not unique; registration relies on a pre-insert count.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder().keys(doc! { "email": 1 }).build();
        self.collection.create_index(index).await?;

        tracing::info!(collection = %self.collection.name(), "User indexes created");
        Ok(())
    }

    fn by_id(id: ObjectId) -> Document {
        doc! { "_id": id }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn count_by_email(&self, email: &str) -> UserResult<u64> {
        let count = self.collection.count_documents(doc! { "email": email }).await?;
        Ok(count)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: &User) -> UserResult<()> {
        self.collection.insert_one(user).await?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let user = self.collection.find_one(Self::by_id(id)).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update_last_login_at(&self, id: ObjectId, at: DateTime<Utc>) -> UserResult<()> {
        let update = doc! { "$set": { "lastLoginAt": to_bson(&at)? } };
        self.collection.update_one(Self::by_id(id), update).await?;
        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: ObjectId, password_hash: &str) -> UserResult<()> {
        let update = doc! {
            "$set": { "password": password_hash, "updatedAt": to_bson(&Utc::now())? }
        };
        self.collection.update_one(Self::by_id(id), update).await?;

        tracing::info!(user_id = %id, "Password updated");
        Ok(())
    }

    #[instrument(skip(self, update), fields(changed = update.changed()))]
    async fn update_fields(&self, id: ObjectId, update: UpdateSet) -> UserResult<u64> {
        let update = doc! { "$set": update.into_document() };
        let result = self.collection.update_one(Self::by_id(id), update).await?;

        tracing::info!(user_id = %id, matched = result.matched_count, "User fields updated");
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(result.deleted_count > 0)
    }
}
