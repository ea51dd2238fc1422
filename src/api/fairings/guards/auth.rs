use log::debug;
use rocket::Request;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};

use crate::api::GuardError;
use crate::api::fairings::VALIDATION;
use crate::api::fairings::utils::try_jwt_cookie_auth;

/// Admin gate for listing, exporting and deleting registrations.
///
/// Succeeds only when the session cookie holds an unexpired admin token.
pub struct GuardAuth;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GuardAuth {
    type Error = GuardError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match try_jwt_cookie_auth(req, &VALIDATION) {
            Ok(claims) => {
                debug!("Admin session accepted, expires at {}", claims.exp);
                Outcome::Success(GuardAuth)
            }
            Err(err) => {
                let reason = format!("no valid admin session for {}", req.uri());
                Outcome::Error((Status::Unauthorized, err.context(reason).into()))
            }
        }
    }
}
