use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

use crate::config::AppConfig;

pub const STICKER_SUBJECT: &str = "Your Vehicle QR Sticker";
const STICKER_BODY: &str = "Attached is your vehicle QR sticker.";
const STICKER_FILENAME: &str = "sticker.png";

/// Outbound mail relay that delivers a rendered sticker.
pub trait StickerMailer: Send + Sync {
    fn send_sticker(&self, to: &str, png: &[u8], subject: &str) -> Result<()>;
}

/// Sends stickers through an SMTP relay using STARTTLS and static credentials.
pub struct SmtpMailer {
    from: String,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .context(format!("invalid SMTP relay {:?}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .timeout(Some(config.mail_timeout()))
            .build();

        Ok(Self {
            from: config.mail_from.clone(),
            transport,
        })
    }
}

/// Build the single-attachment plaintext message carrying the sticker.
pub fn build_sticker_message(from: &str, to: &str, png: &[u8], subject: &str) -> Result<Message> {
    let from: Mailbox = from
        .parse()
        .context(format!("invalid sender address {:?}", from))?;
    let to: Mailbox = to
        .parse()
        .context(format!("invalid destination address {:?}", to))?;
    let content_type = ContentType::parse("image/png").context("invalid attachment type")?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(STICKER_BODY.to_string()))
                .singlepart(
                    Attachment::new(STICKER_FILENAME.to_string()).body(png.to_vec(), content_type),
                ),
        )
        .context("failed to build sticker email")
}

impl StickerMailer for SmtpMailer {
    fn send_sticker(&self, to: &str, png: &[u8], subject: &str) -> Result<()> {
        let message = build_sticker_message(&self.from, to, png, subject)?;
        self.transport
            .send(&message)
            .context(format!("failed to send sticker to {}", to))?;
        info!("Sticker emailed to {}", to);
        Ok(())
    }
}
