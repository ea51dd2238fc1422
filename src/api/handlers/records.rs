use log::info;
use rocket::http::Header;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::{Responder, Route, State, get};
use std::sync::Arc;

use crate::api::fairings::guards::auth::GuardAuth;
use crate::api::{AppResult, GuardResult};
use crate::database::RecordStore;
use crate::models::Registration;

pub const RECORDS_PATH: &str = "/records";
const EXPORT_FILENAME: &str = "records.csv";

pub fn generate_record_routes() -> Vec<Route> {
    routes![list_records, export_records, delete_record]
}

#[derive(Responder)]
#[response(content_type = "text/csv")]
pub struct ExportResponse {
    body: Vec<u8>,
    disposition: Header<'static>,
}

#[get("/records")]
pub async fn list_records(
    auth: GuardResult<GuardAuth>,
    store: &State<Arc<RecordStore>>,
) -> AppResult<Json<Vec<Registration>>> {
    let _ = auth?;
    let store = Arc::clone(store.inner());
    let rows = tokio::task::spawn_blocking(move || store.list_all()).await??;
    Ok(Json(rows))
}

#[get("/export")]
pub async fn export_records(
    auth: GuardResult<GuardAuth>,
    store: &State<Arc<RecordStore>>,
) -> AppResult<ExportResponse> {
    let _ = auth?;
    let store = Arc::clone(store.inner());
    let body = tokio::task::spawn_blocking(move || store.export()).await??;
    Ok(ExportResponse {
        body,
        disposition: Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{EXPORT_FILENAME}\""),
        ),
    })
}

#[get("/delete/<vehicle_number>")]
pub async fn delete_record(
    auth: GuardResult<GuardAuth>,
    store: &State<Arc<RecordStore>>,
    vehicle_number: String,
) -> AppResult<Flash<Redirect>> {
    let _ = auth?;
    let deleted = tokio::task::spawn_blocking({
        let store = Arc::clone(store.inner());
        let vehicle_number = vehicle_number.clone();
        move || store.delete(&vehicle_number)
    })
    .await??;

    if deleted {
        info!("Deleted registration {}", vehicle_number);
        Ok(Flash::success(
            Redirect::to(RECORDS_PATH),
            "Record deleted successfully.",
        ))
    } else {
        Ok(Flash::warning(
            Redirect::to(RECORDS_PATH),
            format!("No record found for vehicle {}.", vehicle_number),
        ))
    }
}
