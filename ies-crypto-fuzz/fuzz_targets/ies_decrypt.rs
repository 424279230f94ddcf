#![no_main]

use ies_crypto::{
    Direction,
    agreement::{Curve, SecretKey},
    ies::{Ecies, IesError, IesKeys},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fixed recipient so that crashes reproduce
    let Ok(recipient) = SecretKey::from_be_bytes(Curve::Secp256k1, &[0x11; 32]) else {
        return;
    };
    let Ok(peer) = SecretKey::from_be_bytes(Curve::Secp256k1, &[0x22; 32]) else {
        return;
    };

    for mut engine in [Ecies::ecies(), Ecies::with_aes_cbc()] {
        let params = engine.default_parameters(Some(&[0u8; 16][..]));

        // Opening arbitrary bytes must never panic and can only fail as invalid ciphertext
        let keys = IesKeys::Recipient { private: recipient.clone() };
        if engine.init(Direction::Decrypt, keys, params.clone()).is_ok() {
            let result = engine.process_block(data);
            assert!(matches!(result, Ok(_) | Err(IesError::InvalidCipherText)));
        }

        let keys = IesKeys::Static { private: recipient.clone(), peer: peer.public_key() };
        if engine.init(Direction::Decrypt, keys, params).is_ok() {
            let result = engine.process_block(data);
            assert!(matches!(result, Ok(_) | Err(IesError::InvalidCipherText)));
        }
    }
});
