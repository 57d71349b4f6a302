//! Upload route limits and completion-callback signing.
//!
//! The hosting provider stores the bytes; this crate only decides whether an
//! upload may start and verifies that completion callbacks really come from
//! the provider (HMAC-SHA256 over the raw request body).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

/// Maximum size of a single image upload (4 MiB).
pub const MAX_IMAGE_BYTES: i64 = 4 * 1024 * 1024;

/// Maximum number of uploads attached to one entry, primary image included.
pub const MAX_GALLERY_UPLOADS: i64 = 8;

/// Header carrying the hex HMAC of a completion callback body.
pub const SIGNATURE_HEADER: &str = "x-upload-signature";

/// Route slug for the single profile image.
pub const ROUTE_ENTRY_PROFILE_IMAGE: &str = "entry-profile-image";

/// Route slug for gallery images.
pub const ROUTE_ENTRY_GALLERY_IMAGE: &str = "entry-gallery-image";

type HmacSha256 = Hmac<Sha256>;

/// Check that one more upload fits under [`MAX_GALLERY_UPLOADS`].
pub fn ensure_gallery_capacity(current_count: i64) -> Result<(), CoreError> {
    if current_count >= MAX_GALLERY_UPLOADS {
        return Err(CoreError::Conflict(
            "Image limit reached for this entry".into(),
        ));
    }
    Ok(())
}

/// Check a reported file size against [`MAX_IMAGE_BYTES`].
pub fn ensure_image_size(size: i64) -> Result<(), CoreError> {
    if size > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "File exceeds the maximum size of {} MB",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Compute the hex HMAC-SHA256 signature of a callback body.
pub fn sign_callback(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex_encode(mac.finalize().into_bytes())
}

/// Verify a callback signature in constant time.
pub fn verify_callback(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Some(signature) = hex_decode(signature_hex.trim()) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
