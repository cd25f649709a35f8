#![no_main]

use libfuzzer_sys::fuzz_target;
use tokenseal::primitives::{PageCursor, TokenClaim};

fuzz_target!(|data: &[u8]| {
    let _ = TokenClaim::from_bytes(data);
    let _ = PageCursor::from_bytes(data);
});
