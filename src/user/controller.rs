use actix_web::{Either, HttpResponse, web};
use log::info;
use serde_json::json;

use crate::session::RequestContext;
use crate::user::model::SignupRequest;
use crate::user::service::{Authentication, UserService};
use crate::utils::error::CustomError;
use crate::utils::helpers::see_other;
use crate::utils::model::LoginRequest;
use crate::views::render;

/// Signup and login accept either a JSON or an urlencoded body.
type Body<T> = Either<web::Json<T>, web::Form<T>>;

fn into_inner<T>(body: Body<T>) -> T {
    match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

/// GET /signup
pub async fn signup_form(ctx: RequestContext) -> Result<HttpResponse, CustomError> {
    render(&ctx, "users/signup", json!({}))
}

/// POST /signup
pub async fn signup(
    mut ctx: RequestContext,
    user_service: web::Data<UserService>,
    body: Body<SignupRequest>,
) -> Result<HttpResponse, CustomError> {
    match user_service.register(into_inner(body)).await {
        Ok(user) => {
            ctx.login(user)?;
            ctx.flash_success("Welcome to StayFinder!")?;
            Ok(see_other("/listings"))
        }
        Err(err @ (CustomError::ConflictError(_) | CustomError::ValidationError(_))) => {
            ctx.flash_error(err.message())?;
            Ok(see_other("/signup"))
        }
        Err(err) => Err(err),
    }
}

/// GET /login
pub async fn login_form(ctx: RequestContext) -> Result<HttpResponse, CustomError> {
    render(&ctx, "users/login", json!({}))
}

/// POST /login
pub async fn login(
    mut ctx: RequestContext,
    user_service: web::Data<UserService>,
    body: Body<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let credentials = into_inner(body);

    match user_service
        .authenticate(&credentials.username, &credentials.password)
        .await?
    {
        Authentication::Success(user) => {
            info!("User {} logged in", user.username);
            let return_to = ctx.take_return_to();
            ctx.login(user)?;
            ctx.flash_success("Welcome back to StayFinder!")?;
            Ok(see_other(return_to.as_deref().unwrap_or("/listings")))
        }
        Authentication::Failure => {
            ctx.flash_error("Invalid username or password.")?;
            Ok(see_other("/login"))
        }
    }
}

/// GET /logout
pub async fn logout(mut ctx: RequestContext) -> Result<HttpResponse, CustomError> {
    ctx.logout();
    ctx.flash_success("You are logged out!")?;
    Ok(see_other("/listings"))
}
