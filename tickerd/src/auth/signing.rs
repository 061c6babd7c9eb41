//! HMAC-SHA256 verification for the subscription webhook.
//!
//! The billing collaborator signs each delivery Standard-Webhooks style:
//! the signature covers `{msg_id}.{timestamp}.{payload}`, is base64-encoded
//! HMAC-SHA256, and arrives in the `webhook-id` / `webhook-timestamp` /
//! `webhook-signature` headers. Secrets are `whsec_`-prefixed base64.
//!
//! See: <https://www.standardwebhooks.com/>

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix for webhook secrets
pub const SECRET_PREFIX: &str = "whsec_";

/// Mint a fresh `whsec_`-prefixed 32-byte random secret.
pub fn generate_secret() -> String {
    use rand::RngCore;

    let mut secret_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret_bytes);

    format!("{}{}", SECRET_PREFIX, BASE64_STANDARD.encode(secret_bytes))
}

/// Raw secret bytes, or `None` if the prefix or base64 is off.
pub fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let encoded = secret.strip_prefix(SECRET_PREFIX)?;
    BASE64_STANDARD.decode(encoded).ok()
}

/// Sign a payload. Returns `v1,{base64-hmac}` or `None` for a bad secret.
pub fn sign_payload(msg_id: &str, timestamp: i64, payload: &str, secret: &str) -> Option<String> {
    let secret_bytes = decode_secret(secret)?;

    let signed_content = format!("{msg_id}.{timestamp}.{payload}");

    let mut mac = HmacSha256::new_from_slice(&secret_bytes).ok()?;
    mac.update(signed_content.as_bytes());
    let signature = mac.finalize().into_bytes();

    Some(format!("v1,{}", BASE64_STANDARD.encode(signature)))
}

/// Check a delivery's signature against the shared secret.
pub fn verify_signature(
    msg_id: &str,
    timestamp: i64,
    payload: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let Some(sig_value) = signature.strip_prefix("v1,") else {
        return false;
    };

    let Some(expected) = sign_payload(msg_id, timestamp, payload, secret) else {
        return false;
    };
    let Some(expected_value) = expected.strip_prefix("v1,") else {
        return false;
    };

    constant_time_eq(sig_value.as_bytes(), expected_value.as_bytes())
}

/// Constant-time comparison so signature checks leak nothing through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_decode_to_32_bytes() {
        let secret = generate_secret();
        assert!(secret.starts_with(SECRET_PREFIX));
        assert_eq!(decode_secret(&secret).unwrap().len(), 32);
    }

    #[test]
    fn bad_secrets_do_not_decode() {
        assert!(decode_secret("sk-not-a-webhook-secret").is_none());
        assert!(decode_secret("whsec_!!!not base64!!!").is_none());
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let secret = generate_secret();
        let payload = r#"{"userId":"u1","tier":"pro"}"#;
        let timestamp = 1704067200;

        let signature = sign_payload("msg_1", timestamp, payload, &secret).unwrap();
        assert!(signature.starts_with("v1,"));
        assert!(verify_signature("msg_1", timestamp, payload, &signature, &secret));

        // Any tampering breaks verification.
        assert!(!verify_signature("msg_2", timestamp, payload, &signature, &secret));
        assert!(!verify_signature("msg_1", timestamp + 1, payload, &signature, &secret));
        assert!(!verify_signature(
            "msg_1",
            timestamp,
            r#"{"userId":"u1","tier":"free"}"#,
            &signature,
            &secret
        ));
        assert!(!verify_signature(
            "msg_1",
            timestamp,
            payload,
            &signature,
            &generate_secret()
        ));
    }

    #[test]
    fn unversioned_signatures_are_rejected() {
        let secret = generate_secret();
        assert!(!verify_signature("id", 1, "payload", "garbage", &secret));
        assert!(!verify_signature("id", 1, "payload", "v2,abcd", &secret));
    }

    #[test]
    fn signing_is_deterministic() {
        let secret = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
        let a = sign_payload("msg_a", 1614265330, r#"{"test": 1}"#, secret).unwrap();
        let b = sign_payload("msg_a", 1614265330, r#"{"test": 1}"#, secret).unwrap();
        assert_eq!(a, b);
    }
}
