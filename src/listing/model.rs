use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::review::model::ReviewDetails;
use crate::user::model::UserView;

pub const DEFAULT_IMAGE_FILENAME: &str = "listingimage";
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85";

fn default_image_filename() -> String {
    DEFAULT_IMAGE_FILENAME.to_string()
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ListingImage {
    #[serde(default = "default_image_filename")]
    pub filename: String,
    #[serde(default = "default_image_url")]
    pub url: String,
}

impl Default for ListingImage {
    fn default() -> Self {
        ListingImage {
            filename: default_image_filename(),
            url: default_image_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: ListingImage,
    pub price: f64,
    pub location: String,
    pub country: String,
    // Listings created before authentication existed have no owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ObjectId>,
    #[serde(default)]
    pub reviews: Vec<ObjectId>,
}

impl Listing {
    pub fn new(input: ListingInput, owner: Option<ObjectId>) -> Self {
        Listing {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            image: input.image,
            price: input.price,
            location: input.location,
            country: input.country,
            owner,
            reviews: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        self.owner.as_ref() == Some(user_id)
    }
}

/// Request body for create and update: `{ "listing": { ... } }`.
///
/// Every field is optional so that missing values are reported by
/// validation alongside every other violation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingPayload {
    pub listing: Option<ListingDraft>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub image: Option<ImageDraft>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ImageDraft {
    pub filename: Option<String>,
    pub url: Option<String>,
}

/// A listing payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    pub image: ListingImage,
    pub price: f64,
    pub location: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ListingImage,
    pub price: f64,
    pub location: String,
    pub country: String,
    pub owner: Option<String>,
    pub reviews: Vec<String>,
}

impl From<&Listing> for ListingView {
    fn from(listing: &Listing) -> Self {
        ListingView {
            id: listing.id.to_hex(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            image: listing.image.clone(),
            price: listing.price,
            location: listing.location.clone(),
            country: listing.country.clone(),
            owner: listing.owner.map(|owner| owner.to_hex()),
            reviews: listing.reviews.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

/// A listing with its owner and reviews (and each review's author) resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ListingImage,
    pub price: f64,
    pub location: String,
    pub country: String,
    pub owner: Option<UserView>,
    pub reviews: Vec<ReviewDetails>,
}

impl ListingDetails {
    pub fn new(listing: Listing, owner: Option<UserView>, reviews: Vec<ReviewDetails>) -> Self {
        ListingDetails {
            id: listing.id.to_hex(),
            title: listing.title,
            description: listing.description,
            image: listing.image,
            price: listing.price,
            location: listing.location,
            country: listing.country,
            owner,
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_documents_fill_in_defaults() {
        let listing: Listing = mongodb::bson::from_document(mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "title": "Old cottage",
            "description": "Listed long before accounts existed",
            "price": 80,
            "location": "Bath",
            "country": "England",
        })
        .unwrap();

        assert_eq!(listing.image, ListingImage::default());
        assert!(listing.owner.is_none());
        assert!(listing.reviews.is_empty());
        assert!(!listing.is_owned_by(&ObjectId::new()));
    }

    #[test]
    fn view_carries_hex_ids() {
        let owner = ObjectId::new();
        let mut listing = Listing::new(
            ListingInput {
                title: "Dune house".into(),
                description: "Boardwalk to the beach and a wood-fired sauna".into(),
                image: ListingImage::default(),
                price: 160.0,
                location: "Texel".into(),
                country: "Netherlands".into(),
            },
            Some(owner),
        );
        let review = ObjectId::new();
        listing.reviews.push(review);

        let view = ListingView::from(&listing);
        assert_eq!(view.id, listing.id.to_hex());
        assert_eq!(view.owner, Some(owner.to_hex()));
        assert_eq!(view.reviews, vec![review.to_hex()]);
    }
}
