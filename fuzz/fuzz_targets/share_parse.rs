#![no_main]

use libfuzzer_sys::fuzz_target;
use keyshard_sss::Share;

fuzz_target!(|data: &[u8]| {
    // Try parsing arbitrary bytes as a UTF-8 string, then as a share.
    // Parsing must never panic — it should always return Ok or Err.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<Share>();

        // Also with a plausible prefix prepended to exercise the body parser
        let prefixed = format!("7-1-{}", s);
        let _ = prefixed.parse::<Share>();
    }
});
