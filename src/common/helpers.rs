// Helper functions for safe logging and token material generation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            // First char, not first byte: local parts may start multibyte
            let initial = parts[0].chars().next().unwrap_or('*');
            format!("{}***@{}", initial, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Generates a random hex-encoded OAuth state string for CSRF protection
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Generates a PKCE code verifier (32 random bytes, base64url without
/// padding, per RFC 7636)
pub fn generate_code_verifier() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Derives the S256 PKCE code challenge from a verifier
pub fn code_challenge_s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Generates a random short code for a link. Random bytes hex-encoded and
/// truncated, so odd lengths are supported.
pub fn generate_short_code(length: usize) -> String {
    let mut bytes = vec![0u8; length.div_ceil(2)];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut hex = hex_encode(&bytes);
    hex.truncate(length);
    hex
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
    }

    #[test]
    fn test_safe_email_log_handles_multibyte_local_part() {
        assert_eq!(safe_email_log("émile@example.com"), "é***@example.com");
        assert_eq!(safe_email_log("日本@example.jp"), "日***@example.jp");
    }

    #[test]
    fn test_safe_email_log_rejects_garbage() {
        assert_eq!(safe_email_log("abc"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_generate_state_length_and_charset() {
        let state = generate_state();
        // 16 bytes hex encoded = 32 characters
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_state_uniqueness() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn test_code_verifier_is_base64url() {
        let verifier = generate_code_verifier();
        // 32 bytes base64url unpadded = 43 characters
        assert_eq!(verifier.len(), 43);
        assert!(!verifier.contains('='));
        assert!(!verifier.contains('+'));
        assert!(!verifier.contains('/'));
    }

    #[test]
    fn test_code_challenge_is_deterministic_s256() {
        // Known vector from RFC 7636 appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            code_challenge_s256(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_generate_short_code_respects_odd_lengths() {
        assert_eq!(generate_short_code(7).len(), 7);
        assert_eq!(generate_short_code(8).len(), 8);
    }
}
