use crate::listing::index::listing_routes;
use crate::user::index::user_routes;
use crate::utils::helpers::see_other;
use actix_web::{HttpResponse, web};

async fn home() -> HttpResponse {
    see_other("/listings")
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
    cfg.configure(listing_routes);
    cfg.configure(user_routes);
}
