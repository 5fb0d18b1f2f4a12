//! Cryptographic Utilities
//!
//! Random bytes, base64url helpers and HMAC-SHA256 signed tokens.
//! A signed token has the form `"{payload}.{base64url(hmac(payload))}"`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random 32-byte secret (development session keys)
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Sign `payload`, producing `"{payload}.{signature}"`
///
/// `payload` must not contain `'.'`.
pub fn sign_token(secret: &[u8], payload: &str) -> String {
    let signature = hmac_sha256(secret, payload.as_bytes());
    format!("{}.{}", payload, to_base64url(&signature))
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// The MAC comparison is constant-time.
pub fn verify_token<'a>(secret: &[u8], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.split_once('.')?;
    if signature_b64.contains('.') {
        return None;
    }

    let signature = from_base64url(signature_b64).ok()?;
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
        assert_ne!(random_secret(), random_secret());
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_sign_and_verify_token() {
        let secret = [7u8; 32];
        let token = sign_token(&secret, "6f1c2c1e-2b1f-4f7a-9a43-0d6f5b1b9b11");

        assert_eq!(
            verify_token(&secret, &token),
            Some("6f1c2c1e-2b1f-4f7a-9a43-0d6f5b1b9b11")
        );
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let secret = [7u8; 32];
        let token = sign_token(&secret, "payload");

        assert!(verify_token(&[8u8; 32], &token).is_none());
        assert!(verify_token(&secret, &token.replace("payload", "pAyload")).is_none());
        assert!(verify_token(&secret, "payload").is_none());
        assert!(verify_token(&secret, "payload.!!!").is_none());
        assert!(verify_token(&secret, &format!("{token}.extra")).is_none());
    }
}
