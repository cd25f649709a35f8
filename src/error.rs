//! Error types for tokenseal.

/// Coarse classification of an [`Error`].
///
/// Callers match on the kind rather than on individual variants when choosing a
/// transport status; see [`crate::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The symmetric key has the wrong size.
    KeyLength,
    /// The credential is structurally impossible (bad encoding, short input, bad claim).
    Malformed,
    /// The AEAD tag did not verify.
    AuthFailure,
    /// The token decrypted correctly but its lifetime has elapsed.
    Expired,
    /// An identity string is not a UUID.
    UuidFormat,
    /// An incoming page token could not be decoded.
    CursorDecode,
    /// The caller lacks the role an operation requires.
    PermissionDenied,
    /// The caller could not be authenticated.
    Unauthenticated,
    /// Anything the caller cannot act on.
    Internal,
}

/// Main error type for the library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The symmetric key is not 16, 24 or 32 bytes long.
    #[error("Invalid key length: {len} bytes (expected 16, 24 or 32)")]
    KeyLength {
        /// Length of the rejected key.
        len: usize,
    },

    /// The ciphertext is too short to contain a nonce.
    #[error("Malformed ciphertext")]
    Malformed,

    /// The ciphertext failed authentication (wrong key, truncation or tampering).
    #[error("Message authentication failed")]
    AuthFailure,

    /// The token is not valid unpadded URL-safe base64.
    #[error("Invalid token encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decrypted payload is not a well-formed token claim.
    #[error("Invalid token claim: {0}")]
    ClaimDecode(String),

    /// The token's expiry is missing or in the past.
    #[error("Token expired")]
    TokenExpired,

    /// An identity string could not be parsed as a UUID.
    #[error("Invalid UUID: {0}")]
    UuidFormat(#[from] uuid::Error),

    /// The page token could not be decoded.
    #[error("Invalid page token: {0}")]
    CursorDecode(String),

    /// The session is absent or its role is below the required minimum.
    #[error("Permission denied")]
    PermissionDenied,

    /// The caller's credentials were rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the discriminant used to pick a transport status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::KeyLength { .. } => ErrorKind::KeyLength,
            Error::Malformed | Error::Base64(_) | Error::ClaimDecode(_) => ErrorKind::Malformed,
            Error::AuthFailure => ErrorKind::AuthFailure,
            Error::TokenExpired => ErrorKind::Expired,
            Error::UuidFormat(_) => ErrorKind::UuidFormat,
            Error::CursorDecode(_) => ErrorKind::CursorDecode,
            Error::PermissionDenied => ErrorKind::PermissionDenied,
            Error::Unauthorized => ErrorKind::Unauthenticated,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}
