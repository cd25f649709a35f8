//! Opaque page tokens for resuming ordered list scans.
//!
//! Cursors are encoded but not encrypted: knowing one only lets a client ask
//! for the rows after a position, and the query is still scoped to the caller's
//! own organization. An empty string is the "first page" cursor.

use std::time::SystemTime;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use prost_types::Timestamp;

use crate::primitives::PageCursor;
use crate::primitives::claims::uuid_to_string;
use crate::{Error, Result};

/// Position decoded from a page token.
///
/// The default value is the start of the scan: no bound and an empty id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    bound_ts: Option<SystemTime>,
    prev_id: String,
}

impl Cursor {
    /// `created_at` of the last row already returned, if any.
    pub fn bound_ts(&self) -> Option<SystemTime> {
        self.bound_ts
    }

    /// Id of the last row already returned, or an empty string on the first page.
    pub fn prev_id(&self) -> &str {
        &self.prev_id
    }

    /// Returns `true` if this cursor points at the start of the scan.
    pub fn is_start(&self) -> bool {
        self.bound_ts.is_none() && self.prev_id.is_empty()
    }
}

/// Encodes the position `(bound_ts, id)` as a page token.
///
/// `bound_ts` of `None` means "from the beginning" and is preserved as such.
///
/// # Errors
///
/// Returns [`Error::UuidFormat`] if `id` is not a UUID.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use tokenseal::{generate_cursor, parse_cursor};
///
/// let ts = UNIX_EPOCH + Duration::new(1_700_000_000, 123);
/// let id = "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01";
///
/// let token = generate_cursor(Some(ts), id).unwrap();
/// let cursor = parse_cursor(&token).unwrap();
/// assert_eq!(cursor.bound_ts(), Some(ts));
/// assert_eq!(cursor.prev_id(), id);
/// ```
pub fn generate_cursor(bound_ts: Option<SystemTime>, id: &str) -> Result<String> {
    let cursor = PageCursor::new(bound_ts.map(Timestamp::from), id)?;
    Ok(URL_SAFE_NO_PAD.encode(cursor.to_bytes()))
}

/// Decodes a page token produced by [`generate_cursor`].
///
/// An empty token is valid and yields [`Cursor::default`].
///
/// # Errors
///
/// Returns [`Error::CursorDecode`] if the token is not unpadded URL-safe base64,
/// is truncated, or carries an out-of-range timestamp.
pub fn parse_cursor(token: &str) -> Result<Cursor> {
    if token.is_empty() {
        return Ok(Cursor::default());
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| Error::CursorDecode(e.to_string()))?;
    let cursor = PageCursor::from_bytes(&bytes)?;

    let bound_ts = cursor
        .bound_ts
        .map(SystemTime::try_from)
        .transpose()
        .map_err(|e| Error::CursorDecode(e.to_string()))?;
    let prev_id = uuid_to_string(&cursor.prev_id)
        .ok_or_else(|| Error::CursorDecode("row id is not a UUID".to_string()))?;

    Ok(Cursor { bound_ts, prev_id })
}
