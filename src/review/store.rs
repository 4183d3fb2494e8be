use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::review::model::Review;
use crate::utils::error::CustomError;

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Review>, CustomError>;

    /// Reviews whose id is in `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Review>, CustomError>;

    async fn insert(&self, review: &Review) -> Result<(), CustomError>;

    async fn delete(&self, id: &ObjectId) -> Result<Option<Review>, CustomError>;

    async fn delete_many(&self, ids: &[ObjectId]) -> Result<u64, CustomError>;

    async fn delete_all(&self) -> Result<u64, CustomError>;
}

pub struct MongoReviewStore {
    collection: Collection<Review>,
}

impl MongoReviewStore {
    pub fn new(database: &Database) -> Self {
        let collection = database.collection::<Review>("reviews");
        MongoReviewStore { collection }
    }
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Review>, CustomError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch review: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Review>, CustomError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch reviews: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect reviews: {}", e))
        })
    }

    async fn insert(&self, review: &Review) -> Result<(), CustomError> {
        self.collection.insert_one(review).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to add review: {}", e))
        })?;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Review>, CustomError> {
        self.collection
            .find_one_and_delete(doc! { "_id": *id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete review: {}", e))
            })
    }

    async fn delete_many(&self, ids: &[ObjectId]) -> Result<u64, CustomError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete reviews: {}", e))
            })?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> Result<u64, CustomError> {
        let result = self.collection.delete_many(doc! {}).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to delete reviews: {}", e))
        })?;
        Ok(result.deleted_count)
    }
}
