//! QR materialization and embeddable markup
//!
//! Turns a payment-request URI into a scannable PNG bitmap, and produces a
//! self-contained HTML snippet a merchant can paste into their own page.
//! Both surfaces reuse [`crate::core::encode::encode`] for the deep link;
//! this module never derives a URI of its own.

use crate::core::encode::{self, NOTE_DONATION};
use crate::types::{ReceiveAccount, SessionError};
use image::{imageops, ImageBuffer, ImageFormat, Rgba};
use qrcode::{EcLevel, QrCode};
use rust_decimal::Decimal;
use std::io::Cursor;

/// Rendering options for the QR bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Minimum width and height of the code area in pixels, excluding
    /// the quiet zone
    pub width: u32,

    /// Quiet-zone border width in modules; 0 disables the border
    pub margin: u32,

    /// RGBA color of the dark modules
    pub dark: [u8; 4],

    /// RGBA color of the light modules
    pub light: [u8; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 512,
            margin: 4,
            dark: [0, 0, 0, 255],
            light: [255, 255, 255, 255],
        }
    }
}

/// Render a URI as a PNG-encoded QR code
///
/// # Errors
///
/// Returns `SessionError::Render` if the URI exceeds the encodable
/// capacity for the chosen error-correction level, or if PNG encoding
/// fails. The error is surfaced rather than truncating the payload;
/// callers keep whatever they rendered previously.
pub fn render_qr(uri: &str, options: &RenderOptions) -> Result<Vec<u8>, SessionError> {
    let code = QrCode::with_error_correction_level(uri.as_bytes(), EcLevel::M)
        .map_err(|e| SessionError::render(e.to_string()))?;
    let modules = code.width() as u32;

    let image = code
        .render::<Rgba<u8>>()
        .quiet_zone(false)
        .min_dimensions(options.width, options.width)
        .dark_color(Rgba(options.dark))
        .light_color(Rgba(options.light))
        .build();

    // min_dimensions scales every module to the same pixel size, so the
    // quiet zone is margin modules of padding in the light color
    let border = options.margin * (image.width() / modules);
    let mut canvas = ImageBuffer::from_pixel(
        image.width() + 2 * border,
        image.height() + 2 * border,
        Rgba(options.light),
    );
    imageops::replace(&mut canvas, &image, i64::from(border), i64::from(border));

    let mut png = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| SessionError::render(e.to_string()))?;
    Ok(png)
}

/// Produce a self-contained HTML snippet embedding the payment deep link
///
/// The snippet uses inline styles only; its single external reference is a
/// barcode-library `<script>` tag that draws the QR client-side. The deep
/// link behind the button comes from [`encode::encode`], so the embedded
/// URI is byte-identical to the one the session previews.
pub fn embed_snippet(account: &ReceiveAccount, amount: Decimal) -> String {
    let uri = encode::encode(account, amount, NOTE_DONATION);

    format!(
        concat!(
            "<div style=\"display:inline-block;padding:16px;border:1px solid #ddd;",
            "border-radius:8px;font-family:sans-serif;text-align:center\">\n",
            "  <div id=\"upi-qr\" style=\"margin-bottom:12px\"></div>\n",
            "  <a href=\"{uri}\" style=\"text-decoration:none\">\n",
            "    <button style=\"background:#3b82f6;color:#fff;border:none;",
            "padding:10px 20px;border-radius:6px;cursor:pointer\">Pay {name}</button>\n",
            "  </a>\n",
            "  <script src=\"https://cdn.jsdelivr.net/npm/qrcodejs@1.0.0/qrcode.min.js\"></script>\n",
            "  <script>new QRCode(document.getElementById(\"upi-qr\"),\"{uri}\");</script>\n",
            "</div>"
        ),
        uri = uri,
        name = account.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn account() -> ReceiveAccount {
        ReceiveAccount::new(1, "merchant@okbank", "Chai Stall")
    }

    #[test]
    fn test_render_produces_png_bytes() {
        let uri = encode::encode(&account(), Decimal::new(100, 0), "Payment");
        let png = render_qr(&uri, &RenderOptions::default()).unwrap();

        // PNG magic bytes
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    fn rendered_width(margin: u32) -> u32 {
        let uri = encode::encode(&account(), Decimal::new(100, 0), "Payment");
        let options = RenderOptions {
            margin,
            ..RenderOptions::default()
        };
        let png = render_qr(&uri, &options).unwrap();
        image::load_from_memory(&png).unwrap().width()
    }

    #[test]
    fn test_margin_widens_the_quiet_zone_proportionally() {
        let bare = rendered_width(0);
        let two = rendered_width(2);
        let four = rendered_width(4);

        // Each margin module adds the same pixel border on both sides
        assert!(two > bare);
        assert_eq!(four - bare, 2 * (two - bare));
    }

    #[test]
    fn test_quiet_zone_uses_the_light_color() {
        let uri = encode::encode(&account(), Decimal::new(100, 0), "Payment");
        let options = RenderOptions {
            light: [250, 250, 240, 255],
            ..RenderOptions::default()
        };

        let png = render_qr(&uri, &options).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();

        assert_eq!(img.get_pixel(0, 0), &Rgba([250, 250, 240, 255]));
    }

    #[test]
    fn test_oversized_payload_surfaces_render_error() {
        // QR version 40 at EcLevel::M tops out well below 4k bytes
        let uri = "x".repeat(4096);

        let result = render_qr(&uri, &RenderOptions::default());

        assert!(matches!(
            result.unwrap_err(),
            SessionError::Render { .. }
        ));
    }

    #[test]
    fn test_snippet_embeds_the_encoded_uri() {
        let account = account();
        let amount = Decimal::new(100, 0);

        let snippet = embed_snippet(&account, amount);
        let uri = encode::encode(&account, amount, NOTE_DONATION);

        // Same URI in the href and in the client-side QR call
        assert_eq!(snippet.matches(&uri).count(), 2);
        assert!(snippet.contains("Pay Chai Stall"));
    }

    #[test]
    fn test_snippet_is_deterministic() {
        let account = account();
        assert_eq!(
            embed_snippet(&account, Decimal::TEN),
            embed_snippet(&account, Decimal::TEN)
        );
    }

    #[test]
    fn test_snippet_has_no_external_styles() {
        let snippet = embed_snippet(&account(), Decimal::TEN);
        assert!(!snippet.contains("<link"));
        assert!(!snippet.contains("class="));
    }
}
