use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use crate::database::Stores;
use crate::listing::store::ListingStore;
use crate::review::model::{Review, ReviewInput};
use crate::review::store::ReviewStore;
use crate::utils::error::CustomError;

pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    listings: Arc<dyn ListingStore>,
}

impl ReviewService {
    pub fn new(stores: &Stores) -> Self {
        ReviewService {
            reviews: stores.reviews.clone(),
            listings: stores.listings.clone(),
        }
    }

    pub async fn find(&self, id: &ObjectId) -> Result<Option<Review>, CustomError> {
        self.reviews.find_by_id(id).await
    }

    /// Save a review and attach it to its listing.
    ///
    /// The review is written before its id is pushed, so a failure in
    /// between leaves an unreferenced review rather than a dangling id.
    pub async fn create(
        &self,
        listing_id: &ObjectId,
        input: ReviewInput,
        author: ObjectId,
    ) -> Result<Review, CustomError> {
        if self.listings.find_by_id(listing_id).await?.is_none() {
            return Err(CustomError::NotFoundError("Listing not found".into()));
        }

        let review = Review::new(input, author);
        self.reviews.insert(&review).await?;

        if !self.listings.push_review(listing_id, &review.id).await? {
            // Listing vanished between the lookup and the push.
            self.reviews.delete(&review.id).await?;
            return Err(CustomError::NotFoundError("Listing not found".into()));
        }

        info!("Review {} added to listing {}", review.id, listing_id);
        Ok(review)
    }

    /// Detach a review from its listing, then delete it.
    pub async fn delete(&self, listing_id: &ObjectId, review_id: &ObjectId) -> Result<(), CustomError> {
        if !self.listings.pull_review(listing_id, review_id).await? {
            warn!("Deleting review {} of missing listing {}", review_id, listing_id);
        }

        self.reviews
            .delete(review_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Review not found".into()))?;

        info!("Review {} removed from listing {}", review_id, listing_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::model::{Listing, ListingImage, ListingInput};

    async fn listing(stores: &Stores) -> Listing {
        let listing = Listing::new(
            ListingInput {
                title: "Mountain chalet".into(),
                description: "Wood stove, ski lockers and a view of the pass".into(),
                image: ListingImage::default(),
                price: 210.0,
                location: "Zermatt".into(),
                country: "Switzerland".into(),
            },
            Some(ObjectId::new()),
        );
        stores.listings.insert(&listing).await.unwrap();
        listing
    }

    fn input() -> ReviewInput {
        ReviewInput {
            comment: "Spotless and warm".into(),
            rating: 5,
        }
    }

    #[actix_web::test]
    async fn create_attaches_the_review_to_its_listing() {
        let stores = Stores::in_memory();
        let service = ReviewService::new(&stores);
        let listing = listing(&stores).await;
        let author = ObjectId::new();

        let review = service.create(&listing.id, input(), author).await.unwrap();

        assert_eq!(review.author, Some(author));
        let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(stored.reviews, vec![review.id]);
        assert!(service.find(&review.id).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn create_on_missing_listing_saves_nothing() {
        let stores = Stores::in_memory();
        let service = ReviewService::new(&stores);

        let err = service
            .create(&ObjectId::new(), input(), ObjectId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }

    #[actix_web::test]
    async fn delete_detaches_and_removes() {
        let stores = Stores::in_memory();
        let service = ReviewService::new(&stores);
        let listing = listing(&stores).await;
        let author = ObjectId::new();
        let first = service.create(&listing.id, input(), author).await.unwrap();
        let second = service.create(&listing.id, input(), author).await.unwrap();

        service.delete(&listing.id, &first.id).await.unwrap();

        assert!(service.find(&first.id).await.unwrap().is_none());
        let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
        assert_eq!(stored.reviews, vec![second.id]);

        let err = service.delete(&listing.id, &first.id).await.unwrap_err();
        assert!(matches!(err, CustomError::NotFoundError(_)));
    }
}
