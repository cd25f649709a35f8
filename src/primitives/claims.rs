//! Wire shapes of token and cursor claims.
//!
//! Both claims are protobuf messages. Identifiers travel as raw 16-byte UUIDs
//! rather than hex strings to keep tokens short.
//!
//! Field layout:
//!
//! ```text
//! TokenClaim { user_id: bytes = 1; org_id: bytes = 2; role: Role = 3; expires_at: Timestamp = 4; }
//! PageCursor { bound_ts: Timestamp = 1; prev_id: bytes = 2; }
//! ```

use prost::Message;
use prost_types::Timestamp;
use uuid::Uuid;

use crate::session::Role;
use crate::{Error, Result};

/// Length of a binary UUID.
pub const UUID_LEN: usize = 16;

/// Identity and authorization facts sealed inside a session token.
#[derive(Clone, PartialEq, Message)]
pub struct TokenClaim {
    /// Authenticated user, as a binary UUID.
    #[prost(bytes = "vec", tag = "1")]
    pub user_id: Vec<u8>,
    /// Organization of the user, as a binary UUID.
    #[prost(bytes = "vec", tag = "2")]
    pub org_id: Vec<u8>,
    /// Role within the organization.
    #[prost(enumeration = "Role", tag = "3")]
    pub role: i32,
    /// Expiry with whole-second precision.
    #[prost(message, optional, tag = "4")]
    pub expires_at: Option<Timestamp>,
}

/// Resume position of a paginated scan.
#[derive(Clone, PartialEq, Message)]
pub struct PageCursor {
    /// `created_at` of the last row on the previous page.
    #[prost(message, optional, tag = "1")]
    pub bound_ts: Option<Timestamp>,
    /// Id of the last row on the previous page, as a binary UUID.
    #[prost(bytes = "vec", tag = "2")]
    pub prev_id: Vec<u8>,
}

/// Parses a textual UUID into its 16-byte form.
///
/// # Errors
///
/// Returns [`Error::UuidFormat`] if the string is not a UUID.
pub fn uuid_to_bytes(id: &str) -> Result<[u8; UUID_LEN]> {
    Ok(*Uuid::parse_str(id)?.as_bytes())
}

/// Renders a 16-byte UUID in lowercase hyphenated form.
///
/// Returns `None` if `bytes` is not exactly 16 bytes long.
pub fn uuid_to_string(bytes: &[u8]) -> Option<String> {
    Uuid::from_slice(bytes).ok().map(|id| id.to_string())
}

impl TokenClaim {
    /// Builds a claim from textual identifiers.
    ///
    /// Both identifiers are validated before anything else happens.
    pub fn new(user_id: &str, org_id: &str, role: Role, expires_at: Timestamp) -> Result<Self> {
        let user_id = uuid_to_bytes(user_id)?;
        let org_id = uuid_to_bytes(org_id)?;

        Ok(Self {
            user_id: user_id.to_vec(),
            org_id: org_id.to_vec(),
            role: role.into(),
            expires_at: Some(expires_at),
        })
    }

    /// Serializes the claim.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Deserializes and structurally validates a claim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClaimDecode`] for truncated protobuf, identifiers that are
    /// not 16 bytes, or an unknown role value.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let claim = Self::decode(bytes).map_err(|e| Error::ClaimDecode(e.to_string()))?;

        if claim.user_id.len() != UUID_LEN {
            return Err(Error::ClaimDecode(format!(
                "user id is {} bytes",
                claim.user_id.len()
            )));
        }
        if claim.org_id.len() != UUID_LEN {
            return Err(Error::ClaimDecode(format!(
                "org id is {} bytes",
                claim.org_id.len()
            )));
        }
        if Role::try_from(claim.role).is_err() {
            return Err(Error::ClaimDecode(format!(
                "unknown role value {}",
                claim.role
            )));
        }

        Ok(claim)
    }
}

impl PageCursor {
    /// Builds a cursor from a textual row id.
    pub fn new(bound_ts: Option<Timestamp>, prev_id: &str) -> Result<Self> {
        let prev_id = uuid_to_bytes(prev_id)?;
        Ok(Self {
            bound_ts,
            prev_id: prev_id.to_vec(),
        })
    }

    /// Serializes the cursor.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Deserializes and structurally validates a cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorDecode`] for truncated protobuf or a row id that is
    /// not 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = Self::decode(bytes).map_err(|e| Error::CursorDecode(e.to_string()))?;

        if cursor.prev_id.len() != UUID_LEN {
            return Err(Error::CursorDecode(format!(
                "row id is {} bytes",
                cursor.prev_id.len()
            )));
        }

        Ok(cursor)
    }
}
