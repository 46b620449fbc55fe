//! Digest utilities: credential hashing and the payment keyed-digest scheme.
//!
//! This is the only module that knows which algorithms are in use. The
//! provider protocol historically mandated a weak digest; we use HMAC-SHA256
//! and keep the construction behind these three functions so swapping the
//! algorithm never touches the authorization core.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Field delimiter of the provider's signature base string.
const DELIMITER: &str = ";";

/// SHA-256 hex digest of a credential (login code or session token).
///
/// One-way: storage compromise exposes digests, not credentials usable for
/// impersonation.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Keyed digest over an ordered field list, hex-encoded.
///
/// The base string is the fields joined with `;` — field order is part of
/// the contract.
pub fn sign_fields(secret: &str, fields: &[&str]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(fields.join(DELIMITER).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex signature against the keyed digest of an ordered field
/// list. Comparison is constant-time; malformed hex simply fails.
pub fn verify_fields(secret: &str, fields: &[&str], signature_hex: &str) -> bool {
    let Ok(provided) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(fields.join(DELIMITER).as_bytes());
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_is_64_hex_chars_and_stable() {
        let digest = sha256_hex("042137");
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(digest, sha256_hex("042137"));
        assert_ne!(digest, sha256_hex("042138"));
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let fields = ["shop", "order-1", "1499", "UAH"];
        let signature = sign_fields("secret", &fields);
        assert!(verify_fields("secret", &fields, &signature));
    }

    #[test]
    fn tampered_field_fails_verification() {
        let signature = sign_fields("secret", &["shop", "order-1", "1499"]);
        assert!(!verify_fields("secret", &["shop", "order-1", "9999"], &signature));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let signature = sign_fields("secret", &["a", "b"]);
        assert!(!verify_fields("other", &["a", "b"], &signature));
    }

    #[test]
    fn field_order_is_part_of_the_contract() {
        assert_ne!(
            sign_fields("secret", &["a", "b"]),
            sign_fields("secret", &["b", "a"])
        );
    }

    #[test]
    fn malformed_hex_fails_closed() {
        assert!(!verify_fields("secret", &["a"], "not-hex"));
        assert!(!verify_fields("secret", &["a"], ""));
    }
}
