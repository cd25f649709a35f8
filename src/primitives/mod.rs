//! Low-level building blocks shared by tokens and cursors.
//!
//! - **aead**: AES-GCM sealing with a nonce prefix, plus the key type
//! - **claims**: protobuf shapes of token and cursor claims
//! - **rng**: operating-system randomness

/// AES-GCM codec and key material.
pub mod aead;
/// Token and cursor claim messages.
pub mod claims;
/// Secure randomness.
pub mod rng;

pub use aead::{SymmetricKey, decrypt, encrypt};
pub use claims::{PageCursor, TokenClaim};
pub use rng::SecureRng;
