pub mod memory;

use std::sync::Arc;

use log::info;
use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};

use crate::listing::store::{ListingStore, MongoListingStore};
use crate::review::store::{MongoReviewStore, ReviewStore};
use crate::user::store::{MongoUserStore, UserStore};
use crate::utils::error::CustomError;

pub use memory::{MemoryListingStore, MemoryReviewStore, MemoryUserStore};

fn connection_error(e: mongodb::error::Error) -> CustomError {
    CustomError::InternalServerError(format!("MongoDB connection failed: {}", e))
}

/// Open a client and make sure the deployment answers.
pub async fn connect(mongodb_uri: &str) -> Result<Client, CustomError> {
    let mut options = ClientOptions::parse(mongodb_uri)
        .await
        .map_err(connection_error)?;
    options.app_name = Some("stayfinder".to_string());

    let client = Client::with_options(options).map_err(connection_error)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(connection_error)?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// One handle per collection, shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub listings: Arc<dyn ListingStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub async fn mongo(client: &Client, database_name: &str) -> Result<Self, CustomError> {
        let database = client.database(database_name);
        Ok(Stores {
            listings: Arc::new(MongoListingStore::new(&database)),
            reviews: Arc::new(MongoReviewStore::new(&database)),
            users: Arc::new(MongoUserStore::init(&database).await?),
        })
    }

    pub fn in_memory() -> Self {
        Stores {
            listings: Arc::new(MemoryListingStore::default()),
            reviews: Arc::new(MemoryReviewStore::default()),
            users: Arc::new(MemoryUserStore::default()),
        }
    }
}
