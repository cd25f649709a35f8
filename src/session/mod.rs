//! Authenticated sessions and their per-request carrier.
//!
//! A [`Session`] is produced only by [`TokenCodec::validate`](crate::TokenCodec::validate).
//! It travels with the request in the tonic extensions map under a key private
//! to this module, so no other code can overwrite or spoof it. Requests without
//! a session are anonymous; every reader must handle that case.

/// Ordinal roles.
pub mod role;

pub use role::{Role, UnknownRole};
use tonic::Request;

use crate::{Error, Result};

/// Identity extracted from a validated token.
///
/// Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    org_id: String,
    role: Role,
}

impl Session {
    pub(crate) fn new(user_id: String, org_id: String, role: Role) -> Self {
        Self {
            user_id,
            org_id,
            role,
        }
    }

    /// Returns the authenticated user's id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the id of the organization the user belongs to.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Returns the user's role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Extension-map key wrapping the session.
#[derive(Clone, Debug)]
struct SessionSlot(Session);

/// Attaches `session` to `request`, replacing any session already present.
pub fn attach_session<T>(request: &mut Request<T>, session: Session) {
    request.extensions_mut().insert(SessionSlot(session));
}

/// Returns the session attached to `request`, if any.
pub fn session_of<T>(request: &Request<T>) -> Option<&Session> {
    request.extensions().get::<SessionSlot>().map(|slot| &slot.0)
}

/// Session accessors on tonic requests.
///
/// # Examples
///
/// ```rust
/// use tokenseal::{Role, SessionExt};
/// use tonic::Request;
///
/// let request = Request::new(());
/// assert!(request.session().is_none());
/// assert!(request.require_role(Role::Viewer).is_err());
/// ```
pub trait SessionExt {
    /// Returns the attached session, if any.
    fn session(&self) -> Option<&Session>;

    /// Returns the session if it holds at least `minimum`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] otherwise; see [`require_role`].
    fn require_role(&self, minimum: Role) -> Result<&Session> {
        require_role(self.session(), minimum)
    }
}

impl<T> SessionExt for Request<T> {
    fn session(&self) -> Option<&Session> {
        session_of(self)
    }
}

/// Checks that a session exists and its role is at least `minimum`.
///
/// Roles compare by rank, so [`Role::Admin`] passes a [`Role::Viewer`] gate.
/// Every failure is the same [`Error::PermissionDenied`], whether the request
/// was anonymous or under-privileged.
///
/// # Errors
///
/// Returns [`Error::PermissionDenied`] if `session` is `None` or its role is
/// below `minimum`.
pub fn require_role(session: Option<&Session>, minimum: Role) -> Result<&Session> {
    match session {
        Some(session) if session.role.satisfies(minimum) => Ok(session),
        _ => Err(Error::PermissionDenied),
    }
}
