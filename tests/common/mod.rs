//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use tokenseal::{SymmetricKey, TokenCodec};

pub const USER: &str = "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01";
pub const ORG: &str = "7d2c3b4a-1e0f-4a9b-8c7d-6e5f4a3b2c1d";

/// Initialize test tracing (call once at the beginning of tests).
///
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("tokenseal=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Codec under a fresh 256-bit key.
pub fn codec() -> TokenCodec {
    TokenCodec::new(SymmetricKey::generate(32).expect("32 is a valid key length"))
}

/// Deterministic UUID string for row `n`.
pub fn row_id(n: u128) -> String {
    uuid::Uuid::from_u128(n).to_string()
}
