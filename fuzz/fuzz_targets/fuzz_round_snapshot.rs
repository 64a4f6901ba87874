#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Round snapshots are the largest and most variable payloads the
    // engine adopts; the parser must never panic on hostile input.
    let _ = serde_json::from_slice::<decoy_client::model::Round>(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<decoy_client::model::Game>(s);
    }
});
