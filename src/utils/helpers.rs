use actix_web::HttpResponse;
use actix_web::http::header;
use mongodb::bson::oid::ObjectId;

use crate::utils::error::{CustomError, MISSING_PAGE_MESSAGE};

pub fn service_name() -> String {
    std::env::var("SERVICE_NAME").unwrap_or_else(|_| "StayFinder".to_string())
}

/// Parse an id taken from the request path.
///
/// A malformed id can never match a document, so it is reported as a
/// missing page rather than a bad request.
pub fn parse_object_id(id: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(id).map_err(|_| CustomError::NotFoundError(MISSING_PAGE_MESSAGE.into()))
}

/// `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
