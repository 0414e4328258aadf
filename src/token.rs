use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::{
    error::LoginError,
    types::{Claims, ClaimsInput, Header},
};

type HmacSha256 = Hmac<Sha256>;

/// Seconds since the Unix epoch, floored. A clock set before the epoch reads as 0.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Build and sign a compact HS256 token issued at `now`.
///
/// The header is always `{"alg":"HS256","typ":"JWT"}` and the claims are
/// `{"tipo":..,"iat":now,"exp":now + expiration_seconds}`, each serialized with
/// a fixed key order so the signature is reproducible.
pub fn sign_token(input: &ClaimsInput, secret: &[u8], now: u64) -> Result<String, LoginError> {
    if secret.is_empty() {
        return Err(LoginError::EmptySecret);
    }

    let exp = now
        .checked_add(input.expiration_seconds)
        .ok_or(LoginError::ExpirationOverflow {
            now,
            seconds: input.expiration_seconds,
        })?;

    let claims = Claims {
        tipo: input.kind,
        iat: now,
        exp,
    };

    let signing_input = format!(
        "{}.{}",
        encode_segment(&Header::HS256)?,
        encode_segment(&claims)?
    );

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| LoginError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, LoginError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}
