#![no_main]

use libfuzzer_sys::fuzz_target;
use revisar::filter::RuleFilter;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Attempt to parse the filter expression
        // This should not panic regardless of input
        let _ = RuleFilter::from_expr(input);
    }
});
