//! Operating-system backed randomness for nonces and keys.

use rand_core::{CryptoRng, OsRng, RngCore};

/// Cryptographically secure random number generator.
///
/// Wraps `OsRng`. It holds no state, so every codec call constructs its own
/// instance instead of sharing one across requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new generator backed by the operating system.
    pub fn new() -> Self {
        Self(OsRng)
    }

    /// Returns `N` fresh random bytes.
    pub fn random_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.0.fill_bytes(&mut out);
        out
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}
