use actix_web::HttpServer;
use dotenv::dotenv;
use env_logger::Env;
use log::info;

use stayfinder::{AppState, Config, Stores, build_app, database};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let mongo_client = database::connect(&config.mongodb_uri)
        .await
        .map_err(std::io::Error::other)?;

    let stores = Stores::mongo(&mongo_client, &config.database_name)
        .await
        .map_err(std::io::Error::other)?;
    let state = AppState::new(&stores, config.bcrypt_cost);
    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || build_app(state.clone(), session_key.clone(), cookie_secure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    info!("Server has stopped");

    Ok(())
}
