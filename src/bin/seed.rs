use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use stayfinder::seed::{AdminAccount, seed};
use stayfinder::user::service::UserService;
use stayfinder::{Config, Stores, database};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let client = database::connect(&config.mongodb_uri)
        .await
        .map_err(std::io::Error::other)?;

    let stores = Stores::mongo(&client, &config.database_name)
        .await
        .map_err(std::io::Error::other)?;
    let users = UserService::new(&stores, config.bcrypt_cost);

    match seed(&stores, &users, &AdminAccount::from_env()).await {
        Ok(report) => {
            info!(
                "Seeding complete: {} listings inserted, {} listings and {} reviews removed",
                report.listings_inserted, report.listings_removed, report.reviews_removed
            );
            Ok(())
        }
        Err(e) => {
            error!("Seeding failed: {}", e);
            Err(std::io::Error::other(e.to_string()))
        }
    }
}
