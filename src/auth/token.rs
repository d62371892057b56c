use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

/// Raw entropy per refresh token. 32 bytes gives 256 bits; collisions are
/// negligible over the lifetime of the system.
pub const TOKEN_BYTES: usize = 32;

/// Length of the encoded plaintext handed to clients.
pub const TOKEN_ENCODED_LEN: usize = 43;

/// Generates opaque refresh-token plaintexts from the OS CSPRNG.
///
/// The plaintext leaves `issue` exactly once; nothing is retained here.
/// Persistence stores only a one-way hash of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_length() {
        let issuer = TokenIssuer::new();
        for _ in 0..16 {
            assert_eq!(issuer.issue().len(), TOKEN_ENCODED_LEN);
        }
    }

    #[test]
    fn test_tokens_are_distinct() {
        let issuer = TokenIssuer::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(issuer.issue()), "duplicate token issued");
        }
    }

    #[test]
    fn test_url_safe_alphabet() {
        let issuer = TokenIssuer::new();
        let token = issuer.issue();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
