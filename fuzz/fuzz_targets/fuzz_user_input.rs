#![no_main]

use libfuzzer_sys::fuzz_target;
use solvault_crypto::{parse_derivation_path, validate_mnemonic, Mnemonic};
use solvault_types::{PublicKey, Signature};

// Everything a user can paste into the wallet: phrases, addresses,
// signatures and derivation paths. None of it may panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let valid = validate_mnemonic(text);
    assert_eq!(Mnemonic::parse(text).is_ok(), valid);

    if let Ok(key) = PublicKey::from_base58(text) {
        assert_eq!(PublicKey::from_base58(&key.to_base58()), Ok(key));
    }
    let _ = Signature::from_base58(text);
    let _ = parse_derivation_path(text);
});
