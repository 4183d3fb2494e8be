use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use log::debug;
use mongodb::bson::oid::ObjectId;

use crate::session::flash::Flash;
use crate::user::model::User;
use crate::user::service::UserService;
use crate::utils::error::CustomError;

const USER_ID_KEY: &str = "user_id";
const FLASH_KEY: &str = "flash";
const RETURN_TO_KEY: &str = "return_to";

/// Per-request view of the session: the cookie session itself plus the user
/// it identifies, resolved before the handler runs.
pub struct RequestContext {
    session: Session,
    user: Option<User>,
}

impl RequestContext {
    pub fn new(session: Session, user: Option<User>) -> Self {
        RequestContext { session, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Establish `user` as the session identity.
    pub fn login(&mut self, user: User) -> Result<(), CustomError> {
        self.session.renew();
        self.session
            .insert(USER_ID_KEY, user.id.to_hex())
            .map_err(session_error)?;
        self.user = Some(user);
        Ok(())
    }

    /// Drop the session identity. Pending flash messages survive.
    pub fn logout(&mut self) {
        self.session.remove(USER_ID_KEY);
        self.session.remove(RETURN_TO_KEY);
        self.user = None;
    }

    pub fn flash_success(&self, message: impl Into<String>) -> Result<(), CustomError> {
        let mut flash = self.peek_flash()?;
        flash.success.push(message.into());
        self.store_flash(&flash)
    }

    pub fn flash_error(&self, message: impl Into<String>) -> Result<(), CustomError> {
        let mut flash = self.peek_flash()?;
        flash.error.push(message.into());
        self.store_flash(&flash)
    }

    /// Consume pending flash messages.
    pub fn take_flash(&self) -> Result<Flash, CustomError> {
        let flash = self.peek_flash()?;
        if !flash.is_empty() {
            self.session.remove(FLASH_KEY);
        }
        Ok(flash)
    }

    /// Remember where to send the user after logging in.
    pub fn set_return_to(&self, path: &str) -> Result<(), CustomError> {
        self.session
            .insert(RETURN_TO_KEY, path)
            .map_err(session_error)
    }

    pub fn take_return_to(&self) -> Option<String> {
        let path = self.session.remove_as::<String>(RETURN_TO_KEY)?.ok()?;
        // Only same-site paths.
        (path.starts_with('/') && !path.starts_with("//")).then_some(path)
    }

    fn peek_flash(&self) -> Result<Flash, CustomError> {
        Ok(self
            .session
            .get::<Flash>(FLASH_KEY)
            .map_err(session_error)?
            .unwrap_or_default())
    }

    fn store_flash(&self, flash: &Flash) -> Result<(), CustomError> {
        self.session.insert(FLASH_KEY, flash).map_err(session_error)
    }
}

fn session_error(e: impl std::fmt::Display) -> CustomError {
    CustomError::InternalServerError(format!("Session error: {}", e))
}

async fn resolve_user(
    session: &Session,
    users: Option<web::Data<UserService>>,
) -> Result<Option<User>, CustomError> {
    let Some(raw_id) = session.get::<String>(USER_ID_KEY).map_err(session_error)? else {
        return Ok(None);
    };
    let Some(users) = users else {
        return Ok(None);
    };

    let user = match ObjectId::parse_str(&raw_id) {
        Ok(id) => users.find(&id).await?,
        Err(_) => None,
    };

    if user.is_none() {
        debug!("Dropping stale session identity {}", raw_id);
        session.remove(USER_ID_KEY);
    }

    Ok(user)
}

impl FromRequest for RequestContext {
    type Error = CustomError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req.get_session();
        let users = req.app_data::<web::Data<UserService>>().cloned();

        Box::pin(async move {
            let user = resolve_user(&session, users).await?;
            Ok(RequestContext::new(session, user))
        })
    }
}
