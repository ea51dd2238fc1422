use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

const WHATSAPP_SHARE_BASE: &str = "https://wa.me/?text=";

/// Pre-filled WhatsApp share link. The channel cannot carry the sticker image.
pub fn whatsapp_share_url(vehicle_number: &str) -> String {
    let text = format!("Your QR sticker for vehicle {vehicle_number}");
    format!(
        "{WHATSAPP_SHARE_BASE}{}",
        utf8_percent_encode(&text, NON_ALPHANUMERIC)
    )
}
