#![no_main]

use libfuzzer_sys::fuzz_target;
use voteweb_network::normalize_identity;

fuzz_target!(|data: &str| {
    // Normalization only ever strips, never invents.
    let host = normalize_identity(data);
    assert!(data.contains(host));
});
