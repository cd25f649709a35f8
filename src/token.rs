//! Issuing and validating encrypted session tokens.
//!
//! A token is `base64url_nopad(nonce || AES-GCM(TokenClaim))`. The claim is
//! encrypted rather than signed so the organization and role it carries are
//! neither readable nor forgeable by the bearer.

use std::time::{Duration, SystemTime};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use prost_types::Timestamp;

use crate::primitives::claims::uuid_to_string;
use crate::primitives::{SymmetricKey, TokenClaim, decrypt, encrypt};
use crate::session::{Role, Session};
use crate::{Error, Result};

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(600);

/// A freshly minted token together with its expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedToken {
    /// Opaque bearer string, safe for headers and query parameters.
    pub token: String,
    /// Instant after which the token no longer validates. Whole seconds.
    pub expires_at: SystemTime,
}

/// Issues and validates session tokens under a single symmetric key.
///
/// The codec owns its key and holds no other state, so one instance can be
/// shared behind an `Arc` by any number of request handlers.
///
/// # Security
///
/// - Tokens are valid for [`TOKEN_LIFETIME`] and cannot be revoked early
/// - Validation failures other than [`Error::TokenExpired`] should be reported to
///   the bearer as one generic error; see [`crate::status`]
///
/// # Examples
///
/// ```rust
/// use tokenseal::{Role, SymmetricKey, TokenCodec};
///
/// let codec = TokenCodec::new(SymmetricKey::generate(32).unwrap());
/// let issued = codec
///     .issue(
///         "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01",
///         "7d2c3b4a-1e0f-4a9b-8c7d-6e5f4a3b2c1d",
///         Role::Builder,
///     )
///     .unwrap();
///
/// let session = codec.validate(&issued.token).unwrap();
/// assert_eq!(session.role(), Role::Builder);
/// ```
#[derive(Clone, Debug)]
pub struct TokenCodec {
    key: SymmetricKey,
}

impl TokenCodec {
    /// Creates a codec that seals tokens under `key`.
    pub fn new(key: SymmetricKey) -> Self {
        Self { key }
    }

    /// Issues a token for `user_id` in `org_id` with `role`, expiring
    /// [`TOKEN_LIFETIME`] from now.
    ///
    /// # Errors
    ///
    /// - [`Error::UuidFormat`] if either identifier is not a UUID
    /// - [`Error::KeyLength`] if the codec's key has an unsupported size
    pub fn issue(&self, user_id: &str, org_id: &str, role: Role) -> Result<IssuedToken> {
        self.issue_at(user_id, org_id, role, SystemTime::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: &str,
        org_id: &str,
        role: Role,
        now: SystemTime,
    ) -> Result<IssuedToken> {
        let expires_at = expiry_from(now);
        let claim = TokenClaim::new(user_id, org_id, role, expires_at.clone())?;

        let sealed = encrypt(self.key.as_bytes(), &claim.to_bytes())?;
        let expires_at = SystemTime::try_from(expires_at)
            .map_err(|e| Error::Internal(format!("expiry out of range: {e}")))?;

        Ok(IssuedToken {
            token: URL_SAFE_NO_PAD.encode(sealed),
            expires_at,
        })
    }

    /// Validates a bearer token and returns the session it carries.
    ///
    /// # Errors
    ///
    /// - [`Error::Base64`] if the token is not unpadded URL-safe base64
    /// - [`Error::KeyLength`], [`Error::Malformed`] or [`Error::AuthFailure`] if
    ///   the ciphertext cannot be opened
    /// - [`Error::ClaimDecode`] if the decrypted payload is not a token claim
    /// - [`Error::TokenExpired`] if the expiry is missing or in the past
    pub fn validate(&self, token: &str) -> Result<Session> {
        self.validate_at(token, SystemTime::now())
    }

    /// Validates a token as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: SystemTime) -> Result<Session> {
        let sealed = URL_SAFE_NO_PAD.decode(token)?;
        let plaintext = decrypt(self.key.as_bytes(), &sealed)?;
        let claim = TokenClaim::from_bytes(&plaintext)?;

        let expires_at = claim.expires_at.as_ref().ok_or(Error::TokenExpired)?;
        if is_before(expires_at, &Timestamp::from(now)) {
            return Err(Error::TokenExpired);
        }

        let role = Role::try_from(claim.role)
            .map_err(|_| Error::ClaimDecode(format!("unknown role value {}", claim.role)))?;
        let user_id = uuid_to_string(&claim.user_id)
            .ok_or_else(|| Error::ClaimDecode("user id is not a UUID".to_string()))?;
        let org_id = uuid_to_string(&claim.org_id)
            .ok_or_else(|| Error::ClaimDecode("org id is not a UUID".to_string()))?;

        Ok(Session::new(user_id, org_id, role))
    }
}

/// `now + TOKEN_LIFETIME`, with the sub-second part dropped.
fn expiry_from(now: SystemTime) -> Timestamp {
    let now = Timestamp::from(now);
    Timestamp {
        seconds: now.seconds.saturating_add(TOKEN_LIFETIME.as_secs() as i64),
        nanos: 0,
    }
}

fn is_before(a: &Timestamp, b: &Timestamp) -> bool {
    (a.seconds, a.nanos) < (b.seconds, b.nanos)
}
