pub mod claims;
pub mod fairings;
pub mod handlers;

use log::{error, warn};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Flash, Redirect, Responder};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Error returned by route handlers.
///
/// Errors are never rendered as fault pages: an `Unauthorized` status sends
/// the browser to the login form, anything else back to the registration
/// form, each with a flash notice.
#[derive(Debug)]
pub struct AppError {
    pub status: Status,
    pub error: anyhow::Error,
}

#[rocket::async_trait]
impl<'r, 'o: 'r> Responder<'r, 'o> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let chain: Vec<String> = self.error.chain().map(|e| e.to_string()).collect();

        if self.status == Status::Unauthorized {
            warn!("{} {} requires admin: {}", req.method(), req.uri(), chain.join(": "));
            return Flash::error(
                Redirect::to(LOGIN_PATH),
                "Please log in as administrator.",
            )
            .respond_to(req);
        }

        error!(
            "{} {} failed with {}: {}",
            req.method(),
            req.uri(),
            self.status,
            chain.join(": ")
        );
        Flash::error(
            Redirect::to(HOME_PATH),
            format!("Request failed: {}", self.error),
        )
        .respond_to(req)
    }
}

impl<E> From<E> for AppError
where
    anyhow::Error: From<E>,
{
    fn from(err: E) -> Self {
        AppError {
            status: Status::InternalServerError,
            error: anyhow::Error::from(err),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Rejection produced by request guards. Handlers turn it into an
/// [`AppError`] with `?`, which keeps the guard's status.
#[derive(Debug)]
pub struct GuardError {
    pub status: Status,
    pub error: anyhow::Error,
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        AppError {
            status: err.status,
            error: err.error,
        }
    }
}

pub type GuardResult<T> = Result<T, GuardError>;

impl<E> From<E> for GuardError
where
    anyhow::Error: From<E>,
{
    fn from(err: E) -> Self {
        GuardError {
            status: Status::Unauthorized,
            error: anyhow::Error::from(err),
        }
    }
}
