#![no_main]

use libfuzzer_sys::fuzz_target;
use revisar::parser::parse_translation_unit;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The tolerant parser must absorb arbitrary source text
        // without panicking; lex errors are the only failure mode
        let _ = parse_translation_unit(input);
    }
});
