use actix_web::HttpResponse;

use crate::utils::error::CustomError;

/// Fallback for every unmatched route.
pub async fn not_found() -> Result<HttpResponse, CustomError> {
    Err(CustomError::NotFoundError("Page Not Found".into()))
}
