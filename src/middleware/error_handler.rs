use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpRequest, HttpResponse, Result};
use log::{debug, error};
use serde_json::json;

use crate::utils::error::{CustomError, DEFAULT_ERROR_MESSAGE};
use crate::utils::helpers::service_name;
use crate::views::error_page;

/// Does the client ask for JSON rather than a page?
fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Terminal handler for every 4xx/5xx response: renders the error page, or
/// the JSON envelope when the client asks for it.
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let custom = res.response().error().and_then(|e| e.as_error::<CustomError>());

    let message = if status.is_server_error() {
        DEFAULT_ERROR_MESSAGE.to_string()
    } else {
        match (custom, res.response().error()) {
            (Some(custom), _) => custom.public_message().to_string(),
            (None, Some(err)) => err.to_string(),
            (None, None) => status
                .canonical_reason()
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string(),
        }
    };

    if status.is_server_error() {
        match res.response().error() {
            Some(err) => error!("{} {}: {}", res.request().method(), res.request().path(), err),
            None => error!("{} {}: {}", res.request().method(), res.request().path(), status),
        }
    } else {
        debug!("{} {} -> {}: {}", res.request().method(), res.request().path(), status, message);
    }

    let error_code = custom.map(CustomError::error_code).unwrap_or(match status {
        StatusCode::NOT_FOUND => "NOT_FOUND_ERROR",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "BAD_REQUEST_ERROR",
    });

    let new_response = if wants_json(res.request()) {
        HttpResponse::build(status).json(json!({
            "success": false,
            "message": message,
            "httpStatusCode": status.as_u16(),
            "error": error_code,
            "service": service_name(),
        }))
    } else {
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(error_page(status, &message))
    };

    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}
