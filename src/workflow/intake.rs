use anyhow::{Context, Result, anyhow};
use log::info;
use rocket::FromForm;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::database::{Appended, RecordStore};
use crate::delivery::{STICKER_SUBJECT, StickerMailer};
use crate::models::{FIELD_NAMES, Registration};
use crate::operations::sticker::StickerRenderer;

/// Raw registration form as submitted by the owner. Every field is optional
/// so that missing values are reported by [`Submission::validate`].
#[derive(Debug, Clone, Default, FromForm)]
pub struct Submission {
    pub owner_name: Option<String>,
    pub contact_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub relationship: Option<String>,
    pub blood_group: Option<String>,
    pub action: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("An email address is required to send the sticker by email.")]
    MissingEmail,
}

/// How the rendered sticker reaches the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Download,
    Email(String),
    Whatsapp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub registration: Registration,
    pub delivery: Delivery,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl Submission {
    /// Check that all six fields are filled and resolve the delivery action.
    /// Unknown actions fall back to a download.
    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        let fields = [
            &self.owner_name,
            &self.contact_number,
            &self.vehicle_number,
            &self.emergency_contact,
            &self.relationship,
            &self.blood_group,
        ];
        let missing: Vec<&'static str> = FIELD_NAMES
            .iter()
            .zip(fields)
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let delivery = match present(&self.action) {
            Some("email") => match present(&self.email) {
                Some(address) => Delivery::Email(address.to_string()),
                None => return Err(ValidationError::MissingEmail),
            },
            Some("whatsapp") => Delivery::Whatsapp,
            _ => Delivery::Download,
        };

        let registration =
            Registration::from_cells(fields.into_iter().map(|value| present(value).unwrap_or("")));
        Ok(ValidSubmission {
            registration,
            delivery,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStatus {
    Created,
    AlreadyRegistered,
}

impl IntakeStatus {
    pub fn notice(self) -> &'static str {
        match self {
            IntakeStatus::Created => "QR Code Generated.",
            IntakeStatus::AlreadyRegistered => "Record already exists. Showing existing QR code.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntakeStatus::Created => "created",
            IntakeStatus::AlreadyRegistered => "already-registered",
        }
    }
}

#[derive(Debug)]
pub struct Intake {
    pub status: IntakeStatus,
    pub sticker: Vec<u8>,
}

/// Persist `registration` unless its vehicle is already registered, then
/// render its sticker. The sticker always reflects the submitted values;
/// an existing row is never updated.
pub fn register(
    store: &RecordStore,
    renderer: &StickerRenderer,
    registration: &Registration,
) -> Result<Intake> {
    let start_time = Instant::now();
    let status = match store
        .append(registration)
        .context("failed to store registration")?
    {
        Appended::Created => IntakeStatus::Created,
        Appended::Existing(_) => IntakeStatus::AlreadyRegistered,
    };
    let sticker = renderer
        .render(registration)
        .context(format!("failed to render sticker for {}", registration.vehicle_number))?;

    info!(
        duration = &*format!("{:?}", start_time.elapsed());
        "Registration {} {}", registration.vehicle_number, status.as_str()
    );
    Ok(Intake { status, sticker })
}

/// Hand the sticker to the mail relay on the blocking pool, giving up after `limit`.
pub async fn send_sticker_email(
    mailer: Arc<dyn StickerMailer>,
    to: String,
    sticker: Vec<u8>,
    limit: Duration,
) -> Result<()> {
    let task =
        tokio::task::spawn_blocking(move || mailer.send_sticker(&to, &sticker, STICKER_SUBJECT));
    match tokio::time::timeout(limit, task).await {
        Ok(joined) => joined.context("mail delivery task failed")?,
        Err(_) => Err(anyhow!("mail relay did not respond within {:?}", limit)),
    }
}
