#![no_main]

use libfuzzer_sys::fuzz_target;
use voteweb_gateway::{parse_cookie, CSRF_COOKIE_NAME};

fuzz_target!(|data: &str| {
    if let Some(value) = parse_cookie(data, CSRF_COOKIE_NAME) {
        assert!(data.contains(value));
        assert!(!value.contains(';'));
    }
});
