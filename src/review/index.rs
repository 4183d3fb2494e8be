use super::controller::{create_review, delete_review};
use actix_web::web;

/// Mounted inside the `/listings` scope.
pub fn review_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{id}/reviews", web::post().to(create_review))
        .route("/{id}/reviews/{review_id}", web::delete().to(delete_review));
}
