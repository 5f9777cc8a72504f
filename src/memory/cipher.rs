use fernet::Fernet;

use crate::common::credentials::Secret;
use crate::common::errors::{OnpullError, Result};

/// Generate a fresh Fernet key (URL-safe base64, 44 chars)
pub fn generate_key() -> String {
    Fernet::generate_key()
}

/// Symmetric cipher for memory bodies.
///
/// Tokens are standard Fernet tokens, so keys and memories written by
/// any other Fernet implementation read back unchanged.
pub struct MemoryCipher {
    fernet: Fernet,
}

impl MemoryCipher {
    /// Parse a key produced by [`generate_key`]
    pub fn from_encoded(encoded: &Secret) -> Result<Self> {
        let fernet = Fernet::new(encoded.expose().trim()).ok_or_else(|| {
            OnpullError::crypto("encryption key must be 32 bytes of URL-safe base64")
        })?;
        Ok(Self { fernet })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        self.fernet.encrypt(plaintext).into_bytes()
    }

    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(token)
            .map_err(|_| OnpullError::crypto("encrypted memory is not text"))?;
        self.fernet
            .decrypt(text.trim())
            .map_err(|_| OnpullError::crypto("failed to decrypt: invalid token or wrong key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Produced by Python `cryptography.fernet.Fernet`
    const EXISTING_KEY: &str = "8iit8wh-qb-vvyNIkqceJS9hW8MB8x7jjqB0c5D-qAg=";
    const EXISTING_TOKEN: &str = "gAAAAABlU_EA7eKdKLIGb4khd7mNfYAp9WeZFqQoXcHNv7lkf2Cn8F6XTz1-BckYF6hm7jE-iEwPCMIwJfLpLMuUY7rplfw0NmMlgwkPoqyQBaaS-2zRW48=";

    fn cipher(key: &str) -> MemoryCipher {
        MemoryCipher::from_encoded(&Secret::new(key)).unwrap()
    }

    #[test]
    fn test_decrypts_existing_fernet_memory() {
        let plain = cipher(EXISTING_KEY)
            .decrypt(EXISTING_TOKEN.as_bytes())
            .unwrap();
        assert_eq!(String::from_utf8(plain).unwrap(), "old memory 舊記憶");
    }

    #[test]
    fn test_generated_key_round_trips() {
        let encoded = generate_key();
        assert_eq!(encoded.len(), 44);
        let cipher = cipher(&encoded);

        let token = cipher.encrypt("今天也要開心".as_bytes());
        assert!(token.is_ascii());
        assert!(token.starts_with(b"gAAAAA"));
        assert_eq!(cipher.decrypt(&token).unwrap(), "今天也要開心".as_bytes());
    }

    #[test]
    fn test_each_encryption_differs() {
        let cipher = cipher(EXISTING_KEY);
        assert_ne!(cipher.encrypt(b"same"), cipher.encrypt(b"same"));
    }

    #[test]
    fn test_wrong_key_fails_to_decrypt() {
        let err = cipher(&generate_key())
            .decrypt(EXISTING_TOKEN.as_bytes())
            .unwrap_err();
        assert!(matches!(err, OnpullError::Crypto { .. }));
    }

    #[test]
    fn test_malformed_key_rejected() {
        assert!(MemoryCipher::from_encoded(&Secret::new("c2hvcnQ=")).is_err());
        assert!(MemoryCipher::from_encoded(&Secret::new("not base64 at all!")).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(cipher(EXISTING_KEY).decrypt(b"gAAAAAgarbage").is_err());
    }
}
