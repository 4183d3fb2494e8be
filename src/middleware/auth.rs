//! Authorization gates.
//!
//! A gate either passes a value on to the handler or denies the request.
//! A denial is not an error: it leaves a flash message and redirects.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};
use log::debug;

use crate::listing::model::Listing;
use crate::listing::service::ListingService;
use crate::review::model::Review;
use crate::review::service::ReviewService;
use crate::session::RequestContext;
use crate::user::model::User;
use crate::utils::error::CustomError;
use crate::utils::helpers::{parse_object_id, see_other};

pub const PERMISSION_DENIED: &str = "You do not have permission to do that!";

pub enum Gate<T> {
    Pass(T),
    Deny(Denied),
}

#[derive(Debug)]
pub struct Denied {
    location: String,
    message: String,
    return_to: Option<String>,
}

impl Denied {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Denied {
            location: location.into(),
            message: message.into(),
            return_to: None,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Flash the reason and redirect.
    pub fn respond(self, ctx: &RequestContext) -> Result<HttpResponse, CustomError> {
        debug!("Denied, redirecting to {}: {}", self.location, self.message);
        if let Some(path) = &self.return_to {
            ctx.set_return_to(path)?;
        }
        ctx.flash_error(self.message)?;
        Ok(see_other(&self.location))
    }
}

fn show_path(listing_id: &str) -> String {
    format!("/listings/{}", listing_id)
}

/// Pass the session user, or send the visitor to the login form.
pub fn require_login(ctx: &RequestContext, req: &HttpRequest) -> Gate<User> {
    match ctx.user() {
        Some(user) => Gate::Pass(user.clone()),
        None => {
            let mut denied = Denied::new("/login", "You must be logged in first!");
            if *req.method() == Method::GET {
                denied.return_to = Some(req.uri().to_string());
            }
            Gate::Deny(denied)
        }
    }
}

/// Pass the listing when `user` owns it.
pub async fn require_listing_owner(
    listings: &ListingService,
    user: &User,
    listing_id: &str,
) -> Result<Gate<Listing>, CustomError> {
    let id = parse_object_id(listing_id)?;

    let Some(listing) = listings.find(&id).await? else {
        return Ok(Gate::Deny(Denied::new("/listings", "Listing not found")));
    };

    match listing.owner {
        None => Ok(Gate::Deny(Denied::new(
            show_path(listing_id),
            "Authorization not available for this listing",
        ))),
        Some(owner) if owner != user.id => Ok(Gate::Deny(Denied::new(
            show_path(listing_id),
            PERMISSION_DENIED,
        ))),
        Some(_) => Ok(Gate::Pass(listing)),
    }
}

/// Pass the review when it belongs to the listing and `user` wrote it.
pub async fn require_review_author(
    listings: &ListingService,
    reviews: &ReviewService,
    user: &User,
    listing_id: &str,
    review_id: &str,
) -> Result<Gate<Review>, CustomError> {
    let listing_oid = parse_object_id(listing_id)?;
    let review_oid = parse_object_id(review_id)?;

    let Some(listing) = listings.find(&listing_oid).await? else {
        return Ok(Gate::Deny(Denied::new("/listings", "Listing not found")));
    };

    // A review reached through another listing's path is not found here.
    let review = if listing.reviews.contains(&review_oid) {
        reviews.find(&review_oid).await?
    } else {
        None
    };
    let Some(review) = review else {
        return Ok(Gate::Deny(Denied::new(
            show_path(listing_id),
            "Review not found",
        )));
    };

    if review.is_authored_by(&user.id) {
        Ok(Gate::Pass(review))
    } else {
        Ok(Gate::Deny(Denied::new(show_path(listing_id), PERMISSION_DENIED)))
    }
}
