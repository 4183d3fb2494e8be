use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, Error, web};

use crate::database::Stores;
use crate::listing::service::ListingService;
use crate::middleware::error_handler::handle_error;
use crate::middleware::not_found::not_found;
use crate::review::service::ReviewService;
use crate::router::index::routes;
use crate::session::session_middleware;
use crate::user::service::UserService;
use crate::utils::error::CustomError;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub listings: web::Data<ListingService>,
    pub reviews: web::Data<ReviewService>,
    pub users: web::Data<UserService>,
}

impl AppState {
    pub fn new(stores: &Stores, bcrypt_cost: u32) -> Self {
        AppState {
            listings: web::Data::new(ListingService::new(stores)),
            reviews: web::Data::new(ReviewService::new(stores)),
            users: web::Data::new(UserService::new(stores, bcrypt_cost)),
        }
    }
}

pub fn build_app(
    state: AppState,
    session_key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| CustomError::BadRequestError(err.to_string()).into());
    let form_config = web::FormConfig::default()
        .error_handler(|err, _req| CustomError::BadRequestError(err.to_string()).into());

    App::new()
        .app_data(state.listings)
        .app_data(state.reviews)
        .app_data(state.users)
        .app_data(json_config)
        .app_data(form_config)
        .configure(routes)
        .default_service(web::to(not_found))
        .wrap(ErrorHandlers::new().default_handler(handle_error))
        .wrap(session_middleware(session_key, cookie_secure))
        .wrap(Logger::default())
}
