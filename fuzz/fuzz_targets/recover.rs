#![no_main]

use libfuzzer_sys::fuzz_target;
use keyshard_sss::{sss, wrapped};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary line-separated strings through the full recovery
    // pipeline. Recovery must never panic, whatever the input.
    if let Ok(s) = std::str::from_utf8(data) {
        let shares: Vec<&str> = s.lines().collect();
        let _ = sss::recover_secret(&shares, false);
        let _ = sss::recover_secret(&shares, true);
        let _ = wrapped::recover_secret(&shares, true);
    }
});
