use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::user::model::UserView;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub comment: String,
    pub rating: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ObjectId>,
    // Stored as BSON dates under the same names as the existing documents.
    #[serde(
        rename = "createdAt",
        default = "Utc::now",
        with = "chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "updatedAt",
        default = "Utc::now",
        with = "chrono_datetime_as_bson_datetime"
    )]
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(input: ReviewInput, author: ObjectId) -> Self {
        let now = Utc::now();
        Review {
            id: ObjectId::new(),
            comment: input.comment,
            rating: input.rating,
            author: Some(author),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &ObjectId) -> bool {
        self.author.as_ref() == Some(user_id)
    }
}

/// Request body for review creation: `{ "review": { ... } }`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewPayload {
    pub review: Option<ReviewDraft>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewDraft {
    pub comment: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewInput {
    pub comment: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewDetails {
    pub id: String,
    pub comment: String,
    pub rating: i32,
    pub author: Option<UserView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewDetails {
    pub fn new(review: Review, author: Option<UserView>) -> Self {
        ReviewDetails {
            id: review.id.to_hex(),
            comment: review.comment,
            rating: review.rating,
            author,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{DateTime as BsonDateTime, doc};

    #[test]
    fn reviews_written_before_accounts_still_load() {
        let stamp = BsonDateTime::from_millis(1_700_000_000_000);
        let review: Review = mongodb::bson::from_document(doc! {
            "_id": ObjectId::new(),
            "comment": "Great view from the balcony",
            "rating": 4,
            "createdAt": stamp,
            "updatedAt": stamp,
            "__v": 0,
        })
        .unwrap();

        assert!(review.author.is_none());
        assert_eq!(review.rating, 4);
        assert_eq!(review.created_at.timestamp_millis(), 1_700_000_000_000);
        assert!(!review.is_authored_by(&ObjectId::new()));
    }

    #[test]
    fn timestamps_are_stored_as_dates() {
        let review = Review::new(
            ReviewInput {
                comment: "Quiet street, good coffee".into(),
                rating: 5,
            },
            ObjectId::new(),
        );
        let document = mongodb::bson::to_document(&review).unwrap();

        assert!(document.get_datetime("createdAt").is_ok());
        assert!(document.get_datetime("updatedAt").is_ok());
        assert_eq!(document.get_object_id("author").unwrap(), review.author.unwrap());
    }
}
