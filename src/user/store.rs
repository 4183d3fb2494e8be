use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::user::model::User;
use crate::utils::error::CustomError;

pub const DUPLICATE_USER_MESSAGE: &str = "A user with the given username or email is already registered";

const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError>;

    async fn email_exists(&self, email: &str) -> Result<bool, CustomError>;

    async fn insert(&self, user: &User) -> Result<(), CustomError>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    /// Open the users collection, creating its unique indexes if missing.
    pub async fn init(database: &Database) -> Result<Self, CustomError> {
        let collection = database.collection::<User>("users");
        collection.create_indexes(unique_indexes()).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create user indexes: {}", e))
        })?;
        info!("User indexes ready");
        Ok(MongoUserStore { collection })
    }
}

/// Usernames and emails identify exactly one account.
fn unique_indexes() -> Vec<IndexModel> {
    [doc! { "username": 1 }, doc! { "email": 1 }]
        .into_iter()
        .map(|keys| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        })
        .collect()
}

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch user: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch users: {}", e)))?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect users: {}", e))
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch user: {}", e)))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, CustomError> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await
            .map_err(|_| {
                CustomError::InternalServerError("Failed to check email existence".to_string())
            })?;
        Ok(count > 0)
    }

    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        self.collection.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                CustomError::ConflictError(DUPLICATE_USER_MESSAGE.to_string())
            } else {
                CustomError::InternalServerError(format!("Failed to create user: {}", e))
            }
        })?;
        Ok(())
    }
}
