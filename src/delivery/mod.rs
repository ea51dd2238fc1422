pub mod mail;
pub mod share;

pub use mail::{STICKER_SUBJECT, SmtpMailer, StickerMailer};
pub use share::whatsapp_share_url;
