//! CSRF token generation for the double-submit cookie scheme.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per token (256 bits).
pub const CSRF_TOKEN_BYTES: usize = 32;

/// Generate a fresh CSRF token from the OS random source.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}
