//! View models.
//!
//! Handlers that would render a template answer with the template name and
//! the data it would receive, plus the locals every page gets (current user
//! and pending flash messages).

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::{Value, json};

use crate::session::RequestContext;
use crate::user::model::UserView;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;

pub fn render(ctx: &RequestContext, view: &str, data: Value) -> Result<HttpResponse, CustomError> {
    let flash = ctx.take_flash()?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "view": view,
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
        "currUser": ctx.user().map(UserView::from),
        "flash": flash,
        "data": data,
    })))
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{code} | StayFinder</title></head>\n\
         <body>\n\
         <main class=\"error\">\n\
         <h1>{code}</h1>\n\
         <p>{message}</p>\n\
         <a href=\"/listings\">Back to listings</a>\n\
         </main>\n\
         </body>\n\
         </html>\n",
        code = status.as_u16(),
        message = escape_html(message),
    )
}
