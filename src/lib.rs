pub mod app;
pub mod config;
pub mod database;
pub mod listing;
pub mod middleware;
pub mod review;
pub mod router;
pub mod seed;
pub mod session;
pub mod user;
pub mod utils;
pub mod views;

pub use app::{AppState, build_app};
pub use config::Config;
pub use database::Stores;
