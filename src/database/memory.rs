//! In-memory collections with the same semantics as the MongoDB stores.
//!
//! Used by the test suites and handy for running the server without a
//! database. Documents keep their insertion order.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::listing::model::{Listing, ListingInput};
use crate::listing::store::ListingStore;
use crate::review::model::Review;
use crate::review::store::ReviewStore;
use crate::user::model::User;
use crate::user::store::{DUPLICATE_USER_MESSAGE, UserStore};
use crate::utils::error::CustomError;

#[derive(Default)]
pub struct MemoryListingStore {
    listings: RwLock<Vec<Listing>>,
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn find_all(&self) -> Result<Vec<Listing>, CustomError> {
        Ok(self.listings.read().await.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError> {
        let listings = self.listings.read().await;
        Ok(listings.iter().find(|l| l.id == *id).cloned())
    }

    async fn insert(&self, listing: &Listing) -> Result<(), CustomError> {
        let mut listings = self.listings.write().await;
        if listings.iter().any(|l| l.id == listing.id) {
            return Err(CustomError::InternalServerError(format!(
                "Failed to create listing: duplicate id {}",
                listing.id
            )));
        }
        listings.push(listing.clone());
        Ok(())
    }

    async fn insert_many(&self, listings: &[Listing]) -> Result<(), CustomError> {
        for listing in listings {
            self.insert(listing).await?;
        }
        Ok(())
    }

    async fn update(
        &self,
        id: &ObjectId,
        input: &ListingInput,
    ) -> Result<Option<Listing>, CustomError> {
        let mut listings = self.listings.write().await;
        let Some(listing) = listings.iter_mut().find(|l| l.id == *id) else {
            return Ok(None);
        };
        listing.title = input.title.clone();
        listing.description = input.description.clone();
        listing.image = input.image.clone();
        listing.price = input.price;
        listing.location = input.location.clone();
        listing.country = input.country.clone();
        Ok(Some(listing.clone()))
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError> {
        let mut listings = self.listings.write().await;
        let position = listings.iter().position(|l| l.id == *id);
        Ok(position.map(|index| listings.remove(index)))
    }

    async fn delete_all(&self) -> Result<u64, CustomError> {
        let mut listings = self.listings.write().await;
        let removed = listings.len() as u64;
        listings.clear();
        Ok(removed)
    }

    async fn push_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError> {
        let mut listings = self.listings.write().await;
        match listings.iter_mut().find(|l| l.id == *id) {
            Some(listing) => {
                listing.reviews.push(*review_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_review(&self, id: &ObjectId, review_id: &ObjectId) -> Result<bool, CustomError> {
        let mut listings = self.listings.write().await;
        match listings.iter_mut().find(|l| l.id == *id) {
            Some(listing) => {
                listing.reviews.retain(|r| r != review_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Review>, CustomError> {
        let reviews = self.reviews.read().await;
        Ok(reviews.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Review>, CustomError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, review: &Review) -> Result<(), CustomError> {
        self.reviews.write().await.push(review.clone());
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<Option<Review>, CustomError> {
        let mut reviews = self.reviews.write().await;
        let position = reviews.iter().position(|r| r.id == *id);
        Ok(position.map(|index| reviews.remove(index)))
    }

    async fn delete_many(&self, ids: &[ObjectId]) -> Result<u64, CustomError> {
        let mut reviews = self.reviews.write().await;
        let before = reviews.len();
        reviews.retain(|r| !ids.contains(&r.id));
        Ok((before - reviews.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, CustomError> {
        let mut reviews = self.reviews.write().await;
        let removed = reviews.len() as u64;
        reviews.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, CustomError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(CustomError::ConflictError(DUPLICATE_USER_MESSAGE.to_string()));
        }
        users.push(user.clone());
        Ok(())
    }
}
