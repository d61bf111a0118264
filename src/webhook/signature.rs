//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-notion-signature";

/// Optional scheme prefix accepted in front of the hex digest.
const SCHEME_PREFIX: &str = "sha256=";

/// Outcome of checking a signature against a configured secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The signature matches the body
    Accepted,
    /// The signature is missing, malformed or wrong
    Rejected,
}

impl Verification {
    /// Returns true if the signature matched.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Checks `signature` against the HMAC-SHA256 of `body` keyed by `secret`.
///
/// `signature` is the lowercase or uppercase hex digest, optionally
/// prefixed with `sha256=`. Anything that is not valid hex is rejected.
/// The digest comparison runs in constant time.
///
/// Pure: the same inputs always give the same answer.
///
/// # Errors
///
/// Returns [`SignatureError::MissingSecret`] when `secret` is `None` or
/// empty. This is a deployment fault, reported separately from a rejected
/// signature.
pub fn verify(
    secret: Option<&str>,
    body: &[u8],
    signature: &str,
) -> Result<Verification, SignatureError> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSecret)?;

    let hex_digest = signature.trim();
    let hex_digest = hex_digest.strip_prefix(SCHEME_PREFIX).unwrap_or(hex_digest);
    let Ok(provided) = hex::decode(hex_digest) else {
        return Ok(Verification::Rejected);
    };

    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(if mac.verify_slice(&provided).is_ok() {
        Verification::Accepted
    } else {
        Verification::Rejected
    })
}

/// Computes the hex signature Notion would send for `body`.
///
/// # Errors
///
/// Returns [`SignatureError::MissingSecret`] for an empty secret.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn new_mac(secret: &str) -> Result<HmacSha256, SignatureError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)
}
