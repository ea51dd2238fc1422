use anyhow::{Result, anyhow};
use jsonwebtoken::Validation;
use rocket::Request;

use crate::api::claims::Claims;
use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "jwt";

/// Try to authenticate via JWT cookie and check if user is admin
pub fn try_jwt_cookie_auth(req: &Request<'_>, validation: &Validation) -> Result<Claims> {
    let config = req
        .rocket()
        .state::<AppConfig>()
        .ok_or_else(|| anyhow!("Application config is not managed"))?;

    if let Some(jwt_cookie) = req.cookies().get(SESSION_COOKIE) {
        let claims =
            Claims::decode_with_key(jwt_cookie.value(), &config.get_jwt_secret_key(), validation)?;
        if claims.is_admin() {
            return Ok(claims);
        } else {
            return Err(anyhow!("User is not an admin"));
        }
    }
    Err(anyhow!("JWT not found in cookies"))
}
