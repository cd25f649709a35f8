//! Encrypted session tokens and opaque pagination cursors.
//!
//! Two codecs for multi-tenant gRPC services:
//!
//! - **Session tokens** carry a user id, organization id and [`Role`] sealed with
//!   AES-GCM. [`TokenCodec::issue`] mints them and [`TokenCodec::validate`]
//!   turns them back into a [`Session`], enforcing a fixed lifetime.
//! - **Page tokens** carry the resume position of an ordered list scan.
//!   [`generate_cursor`] and [`parse_cursor`] round-trip them exactly.
//!
//! Around those sit the per-request session carrier ([`SessionExt`]), the role
//! gate ([`require_role`]), list pagination ([`pagination`]), and the mapping
//! onto gRPC statuses ([`status`]). With the `server` feature, the [`server`]
//! module adds a tonic interceptor, a sign-in flow and configuration loading.
//!
//! ```rust
//! use tokenseal::{Role, SessionExt, SymmetricKey, TokenCodec, attach_session};
//! use tonic::Request;
//!
//! let codec = TokenCodec::new(SymmetricKey::generate(32).unwrap());
//! let issued = codec
//!     .issue(
//!         "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01",
//!         "7d2c3b4a-1e0f-4a9b-8c7d-6e5f4a3b2c1d",
//!         Role::Publisher,
//!     )
//!     .unwrap();
//!
//! let mut request = Request::new(());
//! attach_session(&mut request, codec.validate(&issued.token).unwrap());
//!
//! assert!(request.require_role(Role::Viewer).is_ok());
//! assert!(request.require_role(Role::Admin).is_err());
//! ```

/// Page tokens.
pub mod cursor;
/// Error types.
pub mod error;
/// List pagination.
pub mod pagination;
/// Codecs and claim shapes.
pub mod primitives;
/// Sessions, roles and the request carrier.
pub mod session;
/// gRPC status mapping.
pub mod status;
/// Session tokens.
pub mod token;

#[cfg(feature = "server")]
/// Interceptor, sign-in flow and configuration.
pub mod server;

pub use cursor::{Cursor, generate_cursor, parse_cursor};
pub use error::{Error, ErrorKind};
pub use pagination::{CursorRow, Page, PageLimits, PageRequest};
pub use primitives::{SecureRng, SymmetricKey};
pub use session::{Role, Session, SessionExt, attach_session, require_role, session_of};
pub use token::{IssuedToken, TOKEN_LIFETIME, TokenCodec};

/// Result type alias for tokenseal operations.
pub type Result<T> = std::result::Result<T, Error>;
