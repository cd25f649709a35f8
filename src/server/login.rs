use std::sync::{Arc, OnceLock};

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use metrics::counter;
use tracing::{info, warn};

use super::directory::{DirectoryError, UserDirectory};
use crate::{Error, IssuedToken, Result, SecureRng, TokenCodec};

/// Signs users in by password and issues session tokens.
///
/// # Security
///
/// An unknown email, an unknown organization and a wrong password all return
/// [`Error::Unauthorized`]. The precise cause is only logged. Unknown users
/// still pay for one password verification so response time does not reveal
/// which emails exist.
#[derive(Clone)]
pub struct LoginFlow {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn UserDirectory>,
}

impl LoginFlow {
    /// Creates a flow that looks users up in `directory` and seals tokens with `codec`.
    pub fn new(codec: Arc<TokenCodec>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { codec, directory }
    }

    /// Verifies `password` for `email` in `org_name` and issues a token.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`] if the user does not exist or the password is wrong
    /// - [`Error::Internal`] if the directory is unavailable
    /// - token issuance errors such as [`Error::KeyLength`]
    pub async fn login(&self, email: &str, org_name: &str, password: &str) -> Result<IssuedToken> {
        let record = match self.directory.read_by_email(email, org_name).await {
            Ok(record) => record,
            Err(DirectoryError::NotFound) | Err(DirectoryError::InvalidFormat(_)) => {
                burn_verification(password);
                counter!("tokenseal.login.failure").increment(1);
                warn!(org = org_name, "sign-in rejected: unknown user");
                return Err(Error::Unauthorized);
            }
            Err(e) => {
                counter!("tokenseal.login.failure").increment(1);
                warn!(org = org_name, error = %e, "sign-in failed: directory error");
                return Err(Error::Internal(e.to_string()));
            }
        };

        if let Err(e) = verify_password(password, &record.password_hash) {
            counter!("tokenseal.login.failure").increment(1);
            warn!(user_id = %record.user_id, org_id = %record.org_id, reason = e, "sign-in rejected");
            return Err(Error::Unauthorized);
        }

        let issued = self
            .codec
            .issue(&record.user_id, &record.org_id, record.role)?;

        counter!("tokenseal.login.success").increment(1);
        info!(user_id = %record.user_id, org_id = %record.org_id, role = %record.role, "signed in");

        Ok(issued)
    }
}

/// Hashes `password` with Argon2id default parameters, for storing in a directory.
///
/// # Errors
///
/// Returns [`Error::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut SecureRng::new());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> std::result::Result<(), &'static str> {
    let parsed = PasswordHash::new(stored).map_err(|_| "stored hash is malformed")?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| "password mismatch")
}

/// Runs one verification against a throwaway hash.
fn burn_verification(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("tokenseal-dummy-password").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}
