use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::listing::model::{ListingPayload, ListingView};
use crate::listing::service::ListingService;
use crate::middleware::auth::{Gate, require_listing_owner, require_login};
use crate::session::RequestContext;
use crate::utils::error::CustomError;
use crate::utils::helpers::{parse_object_id, see_other};
use crate::utils::validation::{into_validation_error, validate_listing};
use crate::views::render;

/// GET /listings
pub async fn index(
    ctx: RequestContext,
    listing_service: web::Data<ListingService>,
) -> Result<HttpResponse, CustomError> {
    let listings = listing_service.all().await?;
    let all_listings: Vec<ListingView> = listings.iter().map(ListingView::from).collect();

    render(&ctx, "listings/index", json!({ "allListings": all_listings }))
}

/// GET /listings/new
pub async fn new_form(ctx: RequestContext, req: HttpRequest) -> Result<HttpResponse, CustomError> {
    if let Gate::Deny(denied) = require_login(&ctx, &req) {
        return denied.respond(&ctx);
    }

    render(&ctx, "listings/new", json!({}))
}

/// POST /listings
pub async fn create(
    ctx: RequestContext,
    req: HttpRequest,
    listing_service: web::Data<ListingService>,
    body: web::Json<ListingPayload>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    let input = validate_listing(&body).map_err(into_validation_error)?;
    listing_service.create(input, user.id).await?;

    ctx.flash_success("New listing created successfully")?;
    Ok(see_other("/listings"))
}

/// GET /listings/{id}
pub async fn show(
    ctx: RequestContext,
    listing_service: web::Data<ListingService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let id = parse_object_id(&path.into_inner())?;

    let listing = listing_service
        .details(&id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Listing not found".into()))?;

    render(&ctx, "listings/show", json!({ "listing": listing }))
}

/// GET /listings/{id}/edit
pub async fn edit_form(
    ctx: RequestContext,
    req: HttpRequest,
    listing_service: web::Data<ListingService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };
    let listing = match require_listing_owner(&listing_service, &user, &path).await? {
        Gate::Pass(listing) => listing,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    render(
        &ctx,
        "listings/edit",
        json!({ "listing": ListingView::from(&listing) }),
    )
}

/// PUT /listings/{id}
pub async fn update(
    ctx: RequestContext,
    req: HttpRequest,
    listing_service: web::Data<ListingService>,
    path: web::Path<String>,
    body: web::Json<ListingPayload>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };
    let listing = match require_listing_owner(&listing_service, &user, &path).await? {
        Gate::Pass(listing) => listing,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    let input = validate_listing(&body).map_err(into_validation_error)?;
    listing_service.update(&listing.id, input).await?;

    ctx.flash_success("Listing updated successfully")?;
    Ok(see_other(&format!("/listings/{}", listing.id.to_hex())))
}

/// DELETE /listings/{id}
pub async fn delete(
    ctx: RequestContext,
    req: HttpRequest,
    listing_service: web::Data<ListingService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user = match require_login(&ctx, &req) {
        Gate::Pass(user) => user,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };
    let listing = match require_listing_owner(&listing_service, &user, &path).await? {
        Gate::Pass(listing) => listing,
        Gate::Deny(denied) => return denied.respond(&ctx),
    };

    listing_service.delete(&listing.id).await?;

    ctx.flash_success("Listing deleted successfully")?;
    Ok(see_other("/listings"))
}
