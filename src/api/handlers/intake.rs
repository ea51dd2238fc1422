use log::{error, info, warn};
use rocket::form::Form;
use rocket::http::Header;
use rocket::response::{Flash, Redirect};
use rocket::{Responder, Route, State, post};
use std::sync::Arc;

use crate::api::{AppResult, HOME_PATH};
use crate::config::AppConfig;
use crate::database::RecordStore;
use crate::delivery::{StickerMailer, whatsapp_share_url};
use crate::operations::sticker::StickerRenderer;
use crate::workflow::{
    Delivery, Intake, IntakeStatus, Submission, ValidSubmission, register, send_sticker_email,
};

pub const REGISTRATION_STATUS_HEADER: &str = "X-Registration-Status";

pub fn generate_intake_routes() -> Vec<Route> {
    routes![submit_registration]
}

fn status_header(status: IntakeStatus) -> Header<'static> {
    Header::new(REGISTRATION_STATUS_HEADER, status.as_str())
}

#[derive(Responder)]
#[response(content_type = "image/png")]
pub struct StickerResponse {
    body: Vec<u8>,
    registration_status: Header<'static>,
}

#[derive(Responder)]
pub enum IntakeResponse {
    Sticker(Flash<StickerResponse>),
    Delivered(Flash<Redirect>, Header<'static>),
    Rejected(Flash<Redirect>),
}

#[post("/", data = "<form>")]
pub async fn submit_registration(
    form: Form<Submission>,
    store: &State<Arc<RecordStore>>,
    renderer: &State<Arc<StickerRenderer>>,
    mailer: &State<Arc<dyn StickerMailer>>,
    config: &State<AppConfig>,
) -> AppResult<IntakeResponse> {
    let ValidSubmission {
        registration,
        delivery,
    } = match form.validate() {
        Ok(valid) => valid,
        Err(rejection) => {
            warn!("Rejected registration: {}", rejection);
            return Ok(IntakeResponse::Rejected(Flash::error(
                Redirect::to(HOME_PATH),
                rejection.to_string(),
            )));
        }
    };

    let Intake { status, sticker } = tokio::task::spawn_blocking({
        let store = Arc::clone(store.inner());
        let renderer = Arc::clone(renderer.inner());
        let registration = registration.clone();
        move || register(&store, &renderer, &registration)
    })
    .await??;

    let response = match delivery {
        Delivery::Download => IntakeResponse::Sticker(Flash::success(
            StickerResponse {
                body: sticker,
                registration_status: status_header(status),
            },
            status.notice(),
        )),
        Delivery::Email(address) => {
            let mailer = Arc::clone(mailer.inner());
            let outcome =
                send_sticker_email(mailer, address.clone(), sticker, config.mail_timeout()).await;
            let flash = match outcome {
                Ok(()) => Flash::success(
                    Redirect::to(HOME_PATH),
                    format!("{} Sticker sent via email.", status.notice()),
                ),
                Err(delivery_error) => {
                    error!("Sticker email to {} failed: {:?}", address, delivery_error);
                    Flash::error(
                        Redirect::to(HOME_PATH),
                        format!(
                            "{} Sticker could not be sent by email: {}",
                            status.notice(),
                            delivery_error
                        ),
                    )
                }
            };
            IntakeResponse::Delivered(flash, status_header(status))
        }
        Delivery::Whatsapp => {
            info!("Sticker for {} prepared for WhatsApp", registration.vehicle_number);
            IntakeResponse::Delivered(
                Flash::success(
                    Redirect::to(whatsapp_share_url(&registration.vehicle_number)),
                    format!("{} Sticker prepared for WhatsApp.", status.notice()),
                ),
                status_header(status),
            )
        }
    };
    Ok(response)
}
