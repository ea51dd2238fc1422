#[macro_use]
extern crate rocket;

pub mod api;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod database;
pub mod delivery;
pub mod models;
pub mod operations;
pub mod workflow;

use anyhow::{Context, Result};
use log::info;
use rocket::{Build, Rocket};
use std::sync::Arc;

use api::handlers::auth::generate_auth_routes;
use api::handlers::intake::generate_intake_routes;
use api::handlers::pages::generate_page_routes;
use api::handlers::records::generate_record_routes;
use config::AppConfig;
use database::RecordStore;
use delivery::{SmtpMailer, StickerMailer};
use operations::sticker::StickerRenderer;

/// Build the server with the SMTP relay from `config`.
pub fn build_rocket(config: AppConfig) -> Result<Rocket<Build>> {
    let mailer: Arc<dyn StickerMailer> = Arc::new(SmtpMailer::from_config(&config)?);
    build_rocket_with_mailer(config, mailer)
}

/// Build the server around an explicit mail collaborator.
///
/// Initializes the record table (fatal on failure) and loads the sticker font.
pub fn build_rocket_with_mailer(
    config: AppConfig,
    mailer: Arc<dyn StickerMailer>,
) -> Result<Rocket<Build>> {
    let store = RecordStore::new(&config.table_path);
    store
        .initialize()
        .context(format!("failed to initialize record table {:?}", config.table_path))?;
    info!("Record table ready at {:?}", store.path());

    let renderer = StickerRenderer::from_font_path(&config.font_path);

    let figment = rocket::Config::figment();

    Ok(rocket::custom(figment)
        .manage(Arc::new(store))
        .manage(Arc::new(renderer))
        .manage(mailer)
        .manage(config)
        .mount("/", generate_page_routes())
        .mount("/", generate_intake_routes())
        .mount("/", generate_auth_routes())
        .mount("/", generate_record_routes()))
}
