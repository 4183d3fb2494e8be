use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    // Accounts carried over from an older store have no bcrypt hash and
    // cannot log in until they sign up again.
    #[serde(default)]
    pub password_hash: String,
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

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The part of a user that may be shown to other users.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn accounts_without_a_bcrypt_hash_still_load() {
        let user: User = mongodb::bson::from_document(doc! {
            "_id": ObjectId::new(),
            "username": "traveller",
            "email": "traveller@example.com",
            "salt": "5f1c",
            "hash": "9a0e",
            "__v": 0,
        })
        .unwrap();

        assert!(user.password_hash.is_empty());
        assert_eq!(UserView::from(&user).username, "traveller");
    }
}
