use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use crate::database::Stores;
use crate::listing::model::{Listing, ListingDetails, ListingInput};
use crate::listing::store::ListingStore;
use crate::review::model::ReviewDetails;
use crate::review::store::ReviewStore;
use crate::user::model::UserView;
use crate::user::store::UserStore;
use crate::utils::error::CustomError;

pub struct ListingService {
    listings: Arc<dyn ListingStore>,
    reviews: Arc<dyn ReviewStore>,
    users: Arc<dyn UserStore>,
}

impl ListingService {
    pub fn new(stores: &Stores) -> Self {
        ListingService {
            listings: stores.listings.clone(),
            reviews: stores.reviews.clone(),
            users: stores.users.clone(),
        }
    }

    pub async fn all(&self) -> Result<Vec<Listing>, CustomError> {
        self.listings.find_all().await
    }

    pub async fn find(&self, id: &ObjectId) -> Result<Option<Listing>, CustomError> {
        self.listings.find_by_id(id).await
    }

    pub async fn create(&self, input: ListingInput, owner: ObjectId) -> Result<Listing, CustomError> {
        let listing = Listing::new(input, Some(owner));
        self.listings.insert(&listing).await?;
        info!("Listing {} created by {}", listing.id, owner);
        Ok(listing)
    }

    pub async fn update(&self, id: &ObjectId, input: ListingInput) -> Result<Listing, CustomError> {
        self.listings
            .update(id, &input)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Cannot update non-existent listing".into()))
    }

    /// Delete a listing together with every review attached to it.
    pub async fn delete(&self, id: &ObjectId) -> Result<Listing, CustomError> {
        let listing = self.listings.delete(id).await?.ok_or_else(|| {
            CustomError::NotFoundError("Cannot delete non-existent listing".into())
        })?;

        let removed = self.reviews.delete_many(&listing.reviews).await?;
        if removed as usize != listing.reviews.len() {
            warn!(
                "Listing {} referenced {} reviews but only {} existed",
                listing.id,
                listing.reviews.len(),
                removed
            );
        }

        info!("Listing {} deleted with {} reviews", listing.id, removed);
        Ok(listing)
    }

    /// Fetch a listing, then expand its owner, its reviews (in listing order)
    /// and each review's author.
    pub async fn details(&self, id: &ObjectId) -> Result<Option<ListingDetails>, CustomError> {
        let Some(listing) = self.find(id).await? else {
            return Ok(None);
        };

        let mut reviews: HashMap<ObjectId, _> = self
            .reviews
            .find_by_ids(&listing.reviews)
            .await?
            .into_iter()
            .map(|review| (review.id, review))
            .collect();

        let mut user_ids: Vec<ObjectId> = Vec::new();
        for id in reviews.values().filter_map(|r| r.author).chain(listing.owner) {
            if !user_ids.contains(&id) {
                user_ids.push(id);
            }
        }

        let users: HashMap<ObjectId, UserView> = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .iter()
            .map(|user| (user.id, UserView::from(user)))
            .collect();

        // Dangling ids are dropped, like an unresolved populate.
        let resolved = listing
            .reviews
            .iter()
            .filter_map(|review_id| reviews.remove(review_id))
            .map(|review| {
                let author = review.author.and_then(|author| users.get(&author).cloned());
                ReviewDetails::new(review, author)
            })
            .collect();

        let owner = listing.owner.and_then(|owner| users.get(&owner).cloned());

        Ok(Some(ListingDetails::new(listing, owner, resolved)))
    }
}
