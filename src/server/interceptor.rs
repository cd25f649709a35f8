use std::sync::Arc;

use metrics::counter;
use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};

use crate::status::to_status;
use crate::{Error, TokenCodec, attach_session};

/// Metadata key carrying the bearer token.
pub const AUTHORIZATION: &str = "authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// Server interceptor that turns a bearer token into a [`Session`](crate::Session).
///
/// - no `authorization` metadata: the request continues anonymously
/// - a valid token: the session is attached to the request extensions
/// - anything else: the request is rejected with `UNAUTHENTICATED`
///
/// The reason for a rejection is logged, never returned.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tokenseal::server::SessionInterceptor;
/// use tokenseal::{SymmetricKey, TokenCodec};
/// use tonic::service::Interceptor;
/// use tonic::Request;
///
/// let codec = Arc::new(TokenCodec::new(SymmetricKey::generate(32).unwrap()));
/// let mut interceptor = SessionInterceptor::new(codec);
///
/// // Anonymous requests pass through untouched.
/// assert!(interceptor.call(Request::new(())).is_ok());
/// ```
#[derive(Clone)]
pub struct SessionInterceptor {
    codec: Arc<TokenCodec>,
}

impl SessionInterceptor {
    /// Creates an interceptor validating tokens with `codec`.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl Interceptor for SessionInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let token = match bearer_token(request.metadata()).map(|t| t.map(str::to_owned)) {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no bearer token; continuing anonymously");
                return Ok(request);
            }
            Err(e) => {
                counter!("tokenseal.validate.failure").increment(1);
                warn!(error = %e, "rejected authorization metadata");
                return Err(to_status(&e));
            }
        };

        match self.codec.validate(&token) {
            Ok(session) => {
                counter!("tokenseal.validate.success").increment(1);
                debug!(user_id = session.user_id(), org_id = session.org_id(), "session attached");
                attach_session(&mut request, session);
                Ok(request)
            }
            Err(e) => {
                counter!("tokenseal.validate.failure").increment(1);
                warn!(error = %e, kind = ?e.kind(), "rejected bearer token");
                Err(to_status(&e))
            }
        }
    }
}

/// Extracts the token from `authorization: Bearer <token>` metadata.
///
/// Returns `Ok(None)` if the key is absent.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] if the value is not ASCII, lacks the
/// `Bearer` scheme, or is empty.
pub fn bearer_token(metadata: &MetadataMap) -> crate::Result<Option<&str>> {
    let Some(value) = metadata.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| Error::Unauthorized)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(Error::Unauthorized)?
        .trim();

    if token.is_empty() {
        return Err(Error::Unauthorized);
    }

    Ok(Some(token))
}
