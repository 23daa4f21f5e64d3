//! QR Identity Badges
//!
//! Renders a user's identity payload as a QR-code PNG, returned as base64
//! text suitable for storing on the user row.

use base64::Engine;
use image::Luma;
use qrcode::QrCode;
use std::io::Cursor;

use crate::error::ApiError;
use crate::models::User;

/// Build the identity payload encoded into a user's QR code
pub fn qr_payload(user: &User) -> String {
    format!("USER:{}|EMAIL:{}|ROLE:{}", user.id, user.email, user.role)
}

/// Render text as a QR-code PNG and encode it as standard base64
pub fn render_png_base64(data: &str) -> Result<String, ApiError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| {
        tracing::error!("QR encoding failed: {:?}", e);
        ApiError::Internal
    })?;

    let img = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| {
            tracing::error!("PNG encoding failed: {:?}", e);
            ApiError::Internal
        })?;

    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}
