//! Password-derived symmetric encryption for pod metadata.
//!
//! Envelopes are `base64(iv || ciphertext)` under AES-256-CFB with the key
//! taken from SHA-256 of the password. There is no salt and no integrity
//! check: a wrong password usually fails UTF-8 decoding, but may also
//! decrypt to garbage.

mod cipher;

pub use cipher::{CipherKey, IV_LENGTH, KEY_LENGTH, decrypt, derive_key, encrypt};

/// Errors produced by the password cipher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),
}
