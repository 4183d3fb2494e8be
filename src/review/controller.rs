use actix_web::{HttpRequest, HttpResponse, web};

use crate::listing::service::ListingService;
use crate::middleware::auth::{Gate, require_login, require_review_author};
use crate::review::model::ReviewPayload;
use crate::review::service::ReviewService;
use crate::session::RequestContext;
use crate::utils::error::CustomError;
use crate::utils::helpers::{parse_object_id, see_other};
use crate::utils::validation::{into_validation_error, validate_review};

/// POST /listings/{id}/reviews
pub async fn create_review(
    ctx: RequestContext,
    req: HttpRequest,
    review_service: web::Data<ReviewService>,
    path: web::Path<String>,
    body: web::Json<ReviewPayload>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    let listing_id = parse_object_id(&path.into_inner())?;
    let input = validate_review(&body).map_err(into_validation_error)?;

    review_service.create(&listing_id, input, user.id).await?;

    ctx.flash_success("Review added successfully")?;
    Ok(see_other(&format!("/listings/{}", listing_id.to_hex())))
}

/// DELETE /listings/{id}/reviews/{review_id}
pub async fn delete_review(
    ctx: RequestContext,
    req: HttpRequest,
    listing_service: web::Data<ListingService>,
    review_service: web::Data<ReviewService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    let (listing_id, review_id) = path.into_inner();
    let review = match require_review_author(
        &listing_service,
        &review_service,
        &user,
        &listing_id,
        &review_id,
    )
    .await?
    {
        Gate::Pass(review) => review,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    let listing_id = parse_object_id(&listing_id)?;
    review_service.delete(&listing_id, &review.id).await?;

    ctx.flash_success("Review deleted")?;
    Ok(see_other(&format!("/listings/{}", listing_id.to_hex())))
}
