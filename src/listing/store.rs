use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use crate::listing::model::{Listing, ListingInput};
use crate::utils::error::CustomError;

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Listing>, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError>;

    async fn insert(&self, listing: &Listing) -> Result<(), CustomError>;

    async fn insert_many(&self, listings: &[Listing]) -> Result<(), CustomError>;

    /// Overwrite the editable fields; owner and reviews are kept.
    async fn update(
        &self,
        id: &ObjectId,
        input: &ListingInput,
    ) -> Result<Option<Listing>, CustomError>;

    async fn delete(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError>;

    async fn delete_all(&self) -> Result<u64, CustomError>;

    /// Append a review id. Returns false when the listing does not exist.
    async fn push_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError>;

    /// Remove every occurrence of a review id. Returns false when the listing
    /// does not exist.
    async fn pull_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoListingStore {
    collection: Collection<Listing>,
}

impl MongoListingStore {
    pub fn new(database: &Database) -> Self {
        let collection = database.collection::<Listing>("listings");
        MongoListingStore { collection }
    }
}

#[async_trait]
impl ListingStore for MongoListingStore {
    async fn find_all(&self) -> Result<Vec<Listing>, CustomError> {
        let cursor = self.collection.find(doc! {}).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to fetch listings: {}", e))
        })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect listings: {}", e))
        })
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch listing: {}", e)))
    }

    async fn insert(&self, listing: &Listing) -> Result<(), CustomError> {
        self.collection.insert_one(listing).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create listing: {}", e))
        })?;
        Ok(())
    }

    async fn insert_many(&self, listings: &[Listing]) -> Result<(), CustomError> {
        if listings.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(listings).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to insert listings: {}", e))
        })?;
        Ok(())
    }

    async fn update(
        &self,
        id: &ObjectId,
        input: &ListingInput,
    ) -> Result<Option<Listing>, CustomError> {
        let update = doc! {
            "$set": {
                "title": &input.title,
                "description": &input.description,
                "image": {
                    "filename": &input.image.filename,
                    "url": &input.image.url,
                },
                "price": input.price,
                "location": &input.location,
                "country": &input.country,
            }
        };

        self.collection
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update listing: {}", e))
            })
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError> {
        self.collection
            .find_one_and_delete(doc! { "_id": *id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete listing: {}", e))
            })
    }

    async fn delete_all(&self) -> Result<u64, CustomError> {
        let result = self.collection.delete_many(doc! {}).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to delete listings: {}", e))
        })?;
        Ok(result.deleted_count)
    }

    async fn push_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$push": { "reviews": Bson::ObjectId(*review_id) } },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to attach review: {}", e))
            })?;
        Ok(result.matched_count > 0)
    }

    async fn pull_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$pull": { "reviews": Bson::ObjectId(*review_id) } },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to detach review: {}", e))
            })?;
        Ok(result.matched_count > 0)
    }
}
