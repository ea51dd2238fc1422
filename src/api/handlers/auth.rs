use log::{info, warn};
use rocket::form::{Form, FromForm};
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::response::{Flash, Redirect};
use rocket::{Route, State, get, post};

use crate::api::AppResult;
use crate::api::LOGIN_PATH;
use crate::api::claims::Claims;
use crate::api::fairings::utils::SESSION_COOKIE;
use crate::api::handlers::records::RECORDS_PATH;
use crate::config::AppConfig;

pub fn generate_auth_routes() -> Vec<Route> {
    routes![authenticate, logout]
}

#[derive(Debug, FromForm)]
pub struct LoginForm {
    password: Option<String>,
}

#[post("/login", data = "<form>")]
pub async fn authenticate(
    form: Form<LoginForm>,
    cookies: &CookieJar<'_>,
    config: &State<AppConfig>,
) -> AppResult<Flash<Redirect>> {
    if form.password.as_deref() != Some(config.password.as_str()) {
        warn!("Administrator login rejected");
        return Ok(Flash::error(Redirect::to(LOGIN_PATH), "Invalid password."));
    }

    let token =
        Claims::new_admin(config.session_ttl()).encode_with_key(&config.get_jwt_secret_key())?;
    cookies.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    );
    info!("Administrator logged in");
    Ok(Flash::success(Redirect::to(RECORDS_PATH), "Logged in."))
}

#[get("/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> Flash<Redirect> {
    cookies.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Flash::success(Redirect::to(LOGIN_PATH), "Logged out.")
}
