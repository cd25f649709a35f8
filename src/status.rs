//! Mapping library errors onto gRPC statuses.
//!
//! Credential failures collapse into one generic message so an untrusted
//! caller cannot tell a wrong key from a corrupted or forged token. Log the
//! original [`Error`] before converting it.

use tonic::Status;

use crate::{Error, ErrorKind};

/// Message for every rejected credential.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Message for a well-formed token whose lifetime has elapsed.
pub const TOKEN_EXPIRED: &str = "token expired";

/// Message for every failed role gate.
pub const PERMISSION_DENIED: &str = "permission denied";

/// Message for a page token that could not be decoded.
pub const INVALID_PAGE_TOKEN: &str = "invalid page token";

/// Message for failures the caller cannot act on.
pub const INTERNAL: &str = "internal error";

/// Maps an error to the status returned to the caller.
///
/// Expired tokens get their own message so clients can prompt for a fresh
/// sign-in.
pub fn to_status(err: &Error) -> Status {
    match err.kind() {
        ErrorKind::Malformed | ErrorKind::AuthFailure | ErrorKind::Unauthenticated => {
            Status::unauthenticated(UNAUTHORIZED)
        }
        ErrorKind::Expired => Status::unauthenticated(TOKEN_EXPIRED),
        ErrorKind::UuidFormat => Status::invalid_argument(err.to_string()),
        ErrorKind::CursorDecode => Status::invalid_argument(INVALID_PAGE_TOKEN),
        ErrorKind::PermissionDenied => Status::permission_denied(PERMISSION_DENIED),
        ErrorKind::KeyLength | ErrorKind::Internal => Status::internal(INTERNAL),
    }
}

/// Like [`to_status`], but also folds expiry into the generic message.
///
/// Used on sign-in paths where any distinction could help enumerate accounts.
pub fn to_status_collapsed(err: &Error) -> Status {
    match err.kind() {
        ErrorKind::Expired => Status::unauthenticated(UNAUTHORIZED),
        _ => to_status(err),
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        to_status(&err)
    }
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;

    #[test]
    fn credential_failures_are_indistinguishable() {
        let errors = [
            Error::Malformed,
            Error::AuthFailure,
            Error::Base64(base64::DecodeError::InvalidPadding),
            Error::ClaimDecode("user id is 0 bytes".to_string()),
            Error::Unauthorized,
        ];

        for err in &errors {
            let status = to_status(err);
            assert_eq!(status.code(), Code::Unauthenticated);
            assert_eq!(status.message(), UNAUTHORIZED);
        }
    }

    #[test]
    fn expiry_is_distinct_unless_collapsed() {
        assert_eq!(to_status(&Error::TokenExpired).message(), TOKEN_EXPIRED);

        let collapsed = to_status_collapsed(&Error::TokenExpired);
        assert_eq!(collapsed.code(), Code::Unauthenticated);
        assert_eq!(collapsed.message(), UNAUTHORIZED);
    }

    #[test]
    fn remaining_kinds() {
        assert_eq!(
            to_status(&Error::KeyLength { len: 3 }).code(),
            Code::Internal
        );
        assert_eq!(
            to_status(&Error::CursorDecode("x".to_string())).code(),
            Code::InvalidArgument
        );
        assert_eq!(
            to_status(&Error::PermissionDenied).code(),
            Code::PermissionDenied
        );
        let uuid_err = uuid::Uuid::parse_str("nope").unwrap_err();
        let status = Status::from(Error::UuidFormat(uuid_err));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().starts_with("Invalid UUID"));
    }
}
