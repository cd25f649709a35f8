//! AES-GCM sealing with a self-describing nonce prefix.
//!
//! Ciphertexts produced here have the layout `nonce (12 bytes) || body || tag (16 bytes)`.
//! The AES variant is selected by key length: 16, 24 or 32 bytes for
//! AES-128, AES-192 and AES-256.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::SecureRng;
use crate::{Error, Result};

/// Length in bytes of the nonce prepended to every ciphertext.
pub const NONCE_LEN: usize = 12;

/// Length in bytes of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Key lengths accepted by [`encrypt`] and [`decrypt`].
pub const VALID_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Symmetric key material used to seal session tokens.
///
/// The bytes are wiped when the key is dropped and never appear in `Debug`
/// output. The length is not checked at construction: a key of the wrong size
/// is reported as [`Error::KeyLength`] by every operation that uses it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(Vec<u8>);

impl SymmetricKey {
    /// Wraps raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Generates a fresh random key of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyLength`] if `len` is not a valid AES key length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tokenseal::SymmetricKey;
    ///
    /// let key = SymmetricKey::generate(32).unwrap();
    /// assert_eq!(key.len(), 32);
    /// ```
    pub fn generate(len: usize) -> Result<Self> {
        check_key_length(len)?;
        let mut bytes = vec![0u8; len];
        rand_core::RngCore::fill_bytes(&mut SecureRng::new(), &mut bytes);
        Ok(Self(bytes))
    }

    /// Decodes a key from standard (padded) base64, the form used in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base64`] for invalid input and [`Error::KeyLength`] if the
    /// decoded key has an unsupported size.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        check_key_length(bytes.len())?;
        Ok(Self(bytes))
    }

    /// Encodes the key as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Returns the key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the key holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

fn check_key_length(len: usize) -> Result<()> {
    if VALID_KEY_LENGTHS.contains(&len) {
        Ok(())
    } else {
        Err(Error::KeyLength { len })
    }
}

/// Encrypts `plaintext` under `key` with a freshly drawn nonce.
///
/// Returns `nonce || ciphertext || tag`. An empty plaintext is valid and yields
/// `nonce || tag`.
///
/// # Errors
///
/// Returns [`Error::KeyLength`] if the key is not 16, 24 or 32 bytes.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_key_length(key.len())?;

    let nonce: [u8; NONCE_LEN] = SecureRng::new().random_bytes();
    let sealed = match key.len() {
        16 => seal::<Aes128Gcm>(key, &nonce, plaintext),
        24 => seal::<Aes192Gcm>(key, &nonce, plaintext),
        _ => seal::<Aes256Gcm>(key, &nonce, plaintext),
    }?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Authenticates and decrypts a ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// - [`Error::KeyLength`] if the key has an unsupported size (checked first)
/// - [`Error::Malformed`] if the input is shorter than a nonce
/// - [`Error::AuthFailure`] for a wrong key, truncation or any tampering
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_key_length(key.len())?;

    if ciphertext.len() < NONCE_LEN {
        return Err(Error::Malformed);
    }
    let (nonce, body) = ciphertext.split_at(NONCE_LEN);

    match key.len() {
        16 => open::<Aes128Gcm>(key, nonce, body),
        24 => open::<Aes192Gcm>(key, nonce, body),
        _ => open::<Aes256Gcm>(key, nonce, body),
    }
}

fn seal<C>(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::KeyLength { len: key.len() })?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), plaintext)
        .map_err(|_| Error::Internal("AES-GCM encryption failed".to_string()))
}

fn open<C>(key: &[u8], nonce: &[u8], body: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::KeyLength { len: key.len() })?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), body)
        .map_err(|_| Error::AuthFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_for_every_key_size() {
        for len in VALID_KEY_LENGTHS {
            let key = SymmetricKey::generate(len).unwrap();
            let sealed = encrypt(key.as_bytes(), b"claim bytes").unwrap();
            assert_eq!(sealed.len(), NONCE_LEN + b"claim bytes".len() + TAG_LEN);
            assert_eq!(decrypt(key.as_bytes(), &sealed).unwrap(), b"claim bytes");
        }
    }

    #[test]
    fn empty_plaintext_is_nonce_and_tag() {
        let key = SymmetricKey::generate(16).unwrap();
        let sealed = encrypt(key.as_bytes(), &[]).unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + TAG_LEN);
        assert!(decrypt(key.as_bytes(), &sealed).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_key_length_before_anything_else() {
        assert!(matches!(
            encrypt(&[0u8; 15], b"x"),
            Err(Error::KeyLength { len: 15 })
        ));
        // A short ciphertext would be Malformed, but the key is checked first.
        assert!(matches!(
            decrypt(&[0u8; 33], &[1, 2, 3]),
            Err(Error::KeyLength { len: 33 })
        ));
    }

    #[test]
    fn short_ciphertext_is_malformed() {
        let key = SymmetricKey::generate(32).unwrap();
        assert!(matches!(
            decrypt(key.as_bytes(), &[0u8; NONCE_LEN - 1]),
            Err(Error::Malformed)
        ));
    }

    #[test]
    fn nonce_only_fails_authentication() {
        let key = SymmetricKey::generate(32).unwrap();
        assert!(matches!(
            decrypt(key.as_bytes(), &[0u8; NONCE_LEN]),
            Err(Error::AuthFailure)
        ));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let key = SymmetricKey::generate(32).unwrap();
        let other = SymmetricKey::generate(32).unwrap();
        let sealed = encrypt(key.as_bytes(), b"payload").unwrap();
        assert!(matches!(
            decrypt(other.as_bytes(), &sealed),
            Err(Error::AuthFailure)
        ));
    }

    #[test]
    fn nonces_are_fresh() {
        let key = SymmetricKey::generate(16).unwrap();
        let a = encrypt(key.as_bytes(), b"same").unwrap();
        let b = encrypt(key.as_bytes(), b"same").unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
    }

    #[test]
    fn key_base64_roundtrip_and_redacted_debug() {
        let key = SymmetricKey::generate(24).unwrap();
        let decoded = SymmetricKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(decoded.as_bytes(), key.as_bytes());
        assert!(!format!("{key:?}").contains(&key.to_base64()));
        assert!(matches!(
            SymmetricKey::from_base64("c2hvcnQ="),
            Err(Error::KeyLength { len: 5 })
        ));
    }
}
