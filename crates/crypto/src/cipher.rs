use aes::Aes256;
use base64::{Engine, engine::general_purpose::STANDARD};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::CipherError;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// Key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Symmetric key derived from a password. Lives only for one call.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey([u8; KEY_LENGTH]);

impl CipherKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(<redacted>)")
    }
}

/// Derives the key as SHA-256 of the UTF-8 password bytes.
pub fn derive_key(password: &str) -> CipherKey {
    CipherKey(Sha256::digest(password.as_bytes()).into())
}

/// Encrypts `plaintext` under `password` with a fresh random IV.
///
/// Two calls with the same inputs return different envelopes.
pub fn encrypt(password: &str, plaintext: &str) -> Result<String, CipherError> {
    let key = derive_key(password);

    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill(&mut iv);

    let mut buf = plaintext.as_bytes().to_vec();
    Aes256CfbEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| CipherError::Encryption(e.to_string()))?
        .encrypt(&mut buf);

    let mut envelope = Vec::with_capacity(IV_LENGTH + buf.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&buf);

    Ok(STANDARD.encode(envelope))
}

/// Decrypts an envelope produced by [`encrypt`].
pub fn decrypt(password: &str, envelope: &str) -> Result<String, CipherError> {
    let contents = STANDARD
        .decode(envelope)
        .map_err(|e| CipherError::Decryption(format!("envelope is not base64: {e}")))?;

    if contents.len() < IV_LENGTH {
        return Err(CipherError::Decryption(format!(
            "envelope is {} bytes, shorter than the {IV_LENGTH}-byte iv",
            contents.len()
        )));
    }

    let (iv, ciphertext) = contents.split_at(IV_LENGTH);
    let key = derive_key(password);

    let mut buf = ciphertext.to_vec();
    Aes256CfbDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CipherError::Decryption(e.to_string()))?
        .decrypt(&mut buf);

    String::from_utf8(buf)
        .map_err(|_| CipherError::Decryption("plaintext is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        assert_eq!(derive_key("secret"), derive_key("secret"));
        assert_ne!(derive_key("secret"), derive_key("Secret"));
    }

    #[test]
    fn key_is_sha256_of_password() {
        // sha256("abc")
        let expected = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(derive_key("abc").as_bytes(), &expected);
    }

    #[test]
    fn roundtrip_recovers_plaintext() {
        for text in ["", "hello", "pod metadata {\"name\":\"photos\"}", "ünïcødé ✓ 日本"] {
            let envelope = encrypt("pw", text).unwrap();
            assert_eq!(decrypt("pw", &envelope).unwrap(), text);
        }
    }

    #[test]
    fn envelope_layout() {
        let envelope = encrypt("pw", "12345").unwrap();
        let raw = STANDARD.decode(&envelope).unwrap();
        assert_eq!(raw.len(), IV_LENGTH + 5);
    }

    #[test]
    fn fresh_iv_per_call() {
        let a = encrypt("pw", "same text").unwrap();
        let b = encrypt("pw", "same text").unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt("pw", &a).unwrap(), "same text");
        assert_eq!(decrypt("pw", &b).unwrap(), "same text");
    }

    #[test]
    fn wrong_password_never_returns_plaintext() {
        let text = "the quick brown fox jumps over the lazy dog";
        let envelope = encrypt("right", text).unwrap();
        match decrypt("wrong", &envelope) {
            Ok(garbage) => assert_ne!(garbage, text),
            Err(e) => assert!(matches!(e, CipherError::Decryption(_))),
        }
    }

    #[test]
    fn malformed_envelopes_rejected() {
        assert!(matches!(
            decrypt("pw", "not base64!!"),
            Err(CipherError::Decryption(_))
        ));
        let short = STANDARD.encode([0u8; 8]);
        assert!(matches!(
            decrypt("pw", &short),
            Err(CipherError::Decryption(_))
        ));
    }

    #[test]
    fn iv_only_envelope_is_empty_plaintext() {
        let envelope = STANDARD.encode([7u8; IV_LENGTH]);
        assert_eq!(decrypt("pw", &envelope).unwrap(), "");
    }
}
