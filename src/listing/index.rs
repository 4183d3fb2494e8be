use super::controller::{create, delete, edit_form, index, new_form, show, update};
use crate::review::index::review_routes;
use actix_web::web;

pub fn listing_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/listings")
            .route("", web::get().to(index))
            .route("", web::post().to(create))
            // Registered before "/{id}" so "new" is not taken for an id.
            .route("/new", web::get().to(new_form))
            .route("/{id}", web::get().to(show))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/edit", web::get().to(edit_form))
            .configure(review_routes),
    );
}
