#![no_main]

use libfuzzer_sys::fuzz_target;
use solvault_types::{parse_ui_amount, Balance};

// Amount strings come straight from the user. Parsing must never panic, and
// anything accepted must display back to the same number of base units.
fuzz_target!(|data: &[u8]| {
    let Some((&decimals, rest)) = data.split_first() else {
        return;
    };
    let decimals = decimals % 20;
    let Ok(input) = std::str::from_utf8(rest) else {
        return;
    };

    if let Ok(raw) = parse_ui_amount(input, decimals) {
        assert!(raw > 0);
        let shown = Balance::new(raw, decimals).ui_amount_string();
        assert_eq!(parse_ui_amount(&shown, decimals), Ok(raw));
    }
});
