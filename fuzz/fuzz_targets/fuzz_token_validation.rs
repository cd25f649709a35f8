#![no_main]

use libfuzzer_sys::fuzz_target;
use tokenseal::{SymmetricKey, TokenCodec};

fuzz_target!(|data: &[u8]| {
    let codec = TokenCodec::new(SymmetricKey::new([0x42u8; 32]));

    if let Ok(token) = std::str::from_utf8(data) {
        let _ = codec.validate(token);
    }
});
