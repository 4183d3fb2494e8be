use std::sync::Arc;

use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::database::Stores;
use crate::user::model::{SignupRequest, User};
use crate::user::store::UserStore;
use crate::utils::error::CustomError;
use crate::utils::hashing;
use crate::utils::validation::{into_validation_error, validate_signup};

/// Outcome of a login attempt. Store failures are reported separately as
/// errors.
#[derive(Debug)]
pub enum Authentication {
    Success(User),
    Failure,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
}

impl UserService {
    pub fn new(stores: &Stores, hash_cost: u32) -> Self {
        UserService {
            users: stores.users.clone(),
            hash_cost,
        }
    }

    pub async fn find(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.users.find_by_id(id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, CustomError> {
        self.users.find_by_username(username).await
    }

    /// Validate the signup request, check uniqueness, hash the password and
    /// store the new user.
    pub async fn register(&self, request: SignupRequest) -> Result<User, CustomError> {
        let (username, email) = validate_signup(&request).map_err(into_validation_error)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(CustomError::ConflictError(
                "A user with the given username is already registered".to_string(),
            ));
        }

        if self.users.email_exists(&email).await? {
            return Err(CustomError::ConflictError(
                "A user with the given email is already registered".to_string(),
            ));
        }

        let password_hash = hashing::hash_password(&request.password, self.hash_cost)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        self.users.insert(&user).await?;
        info!("User {} registered", user.username);

        Ok(user)
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Authentication, CustomError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Ok(Authentication::Failure);
        };
        if user.password_hash.is_empty() {
            return Ok(Authentication::Failure);
        }

        let verified = hashing::verify_password(password, &user.password_hash)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        if verified {
            Ok(Authentication::Success(user))
        } else {
            Ok(Authentication::Failure)
        }
    }
}
