#![no_main]

use libfuzzer_sys::fuzz_target;
use ditables::engine::sanitizer::{Sanitizer, decode_data_uri, encode_data_uri};

fuzz_target!(|data: &[u8]| {
    // Sanitizer input is text; skip invalid UTF-8
    if let Ok(s) = std::str::from_utf8(data) {
        let sanitized = Sanitizer::new("[removed]").sanitize(s);
        assert_eq!(decode_data_uri(&encode_data_uri(&sanitized)).as_deref(), Some(sanitized.as_str()));
    }
});
