// src/signature.rs
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

pub const SIGNATURE_HEADER: &str = "X-Viber-Content-Signature";

/// Hex HMAC-SHA256 of the raw body keyed with the bot's auth token.
pub fn compute_signature(auth_token: &str, body: &[u8]) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(auth_token.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            warn!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify_signature(auth_token: &str, body: &[u8], signature: &str) -> bool {
    let Ok(raw) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(auth_token.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&raw).is_ok()
}
