use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Luma, RgbImage};
use qrcode::{EcLevel, QrCode};

/// Encode `payload` as a square QR image of `side` pixels, dark modules on white.
///
/// The code keeps its standard quiet zone of four light modules.
pub fn generate_qr_image(payload: &str, side: u32) -> Result<RgbImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .context(format!(
            "failed to encode {} byte sticker payload as QR code",
            payload.len()
        ))?;

    // One pixel per module, scaled up afterwards so modules stay sharp.
    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(1, 1)
        .build();
    let modules = DynamicImage::ImageLuma8(modules).to_rgb8();

    Ok(imageops::resize(&modules, side, side, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const DARK: Rgb<u8> = Rgb([0, 0, 0]);
    const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_qr_image_has_requested_size() {
        let image = generate_qr_image("Vehicle Number: KA01AB1234", 150).unwrap();
        assert_eq!(image.dimensions(), (150, 150));
    }

    #[test]
    fn test_qr_image_has_quiet_zone_and_modules() {
        let image = generate_qr_image("hello", 150).unwrap();
        assert_eq!(*image.get_pixel(0, 0), LIGHT);
        assert_eq!(*image.get_pixel(149, 149), LIGHT);
        assert!(image.pixels().any(|pixel| *pixel == DARK));
    }

    #[test]
    fn test_qr_modules_are_sharp() {
        let image = generate_qr_image("Vehicle Number: KA01AB1234", 150).unwrap();
        assert!(image.pixels().all(|pixel| *pixel == DARK || *pixel == LIGHT));
    }

    #[test]
    fn test_oversized_payload_is_an_error() {
        let payload = "x".repeat(4000);
        assert!(generate_qr_image(&payload, 150).is_err());
    }
}
