//! Reset the listings collection to the bundled fixtures.

use std::env;

use log::info;
use serde::Serialize;

use crate::database::Stores;
use crate::listing::model::{Listing, ListingDraft, ListingPayload};
use crate::user::model::{SignupRequest, User};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::validation::{into_validation_error, validate_listing};

const FIXTURES: &str = include_str!("../data/listings.json");

pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminAccount {
    pub fn from_env() -> Self {
        AdminAccount {
            username: env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            email: env::var("SEED_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@stayfinder.com".to_string()),
            password: env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub admin_created: bool,
    pub listings_removed: u64,
    pub reviews_removed: u64,
    pub listings_inserted: usize,
}

pub fn fixtures() -> Result<Vec<ListingDraft>, CustomError> {
    serde_json::from_str(FIXTURES)
        .map_err(|e| CustomError::InternalServerError(format!("Invalid fixture file: {}", e)))
}

async fn find_or_create_admin(
    users: &UserService,
    admin: &AdminAccount,
) -> Result<(User, bool), CustomError> {
    if let Some(user) = users.find_by_username(&admin.username).await? {
        info!("Admin user already exists");
        return Ok((user, false));
    }

    let user = users
        .register(SignupRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
        })
        .await?;
    info!("Admin user created");
    Ok((user, true))
}

/// Wipe listings and reviews, then insert the fixtures owned by the admin.
pub async fn seed(
    stores: &Stores,
    users: &UserService,
    admin: &AdminAccount,
) -> Result<SeedReport, CustomError> {
    let (admin_user, admin_created) = find_or_create_admin(users, admin).await?;

    let listings = fixtures()?
        .into_iter()
        .map(|draft| {
            let payload = ListingPayload {
                listing: Some(draft),
            };
            validate_listing(&payload)
                .map(|input| Listing::new(input, Some(admin_user.id)))
                .map_err(into_validation_error)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let listings_removed = stores.listings.delete_all().await?;
    let reviews_removed = stores.reviews.delete_all().await?;
    info!("Old listings deleted");

    stores.listings.insert_many(&listings).await?;
    info!("Listings inserted with {} as owner", admin_user.username);

    Ok(SeedReport {
        admin_created,
        listings_removed,
        reviews_removed,
        listings_inserted: listings.len(),
    })
}
