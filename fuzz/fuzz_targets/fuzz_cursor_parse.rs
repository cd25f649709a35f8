#![no_main]

use libfuzzer_sys::fuzz_target;
use tokenseal::parse_cursor;

fuzz_target!(|data: &[u8]| {
    if let Ok(token) = std::str::from_utf8(data) {
        let _ = parse_cursor(token);
    }
});
