#![no_main]

use ies_crypto::{
    Mac,
    engines::{AesEngine, DesEngine},
    macs::{CbcBlockCipherMac, CfbBlockCipherMac, HMac, PolyMac128},
};
use libfuzzer_sys::fuzz_target;
use sha2::Sha256;

const KEY: [u8; 16] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0, 1, 2, 3, 4, 5, 6, 7];

fn tag(mac: &mut dyn Mac, chunks: &[&[u8]]) -> Vec<u8> {
    for chunk in chunks {
        mac.update(chunk).unwrap();
    }
    let mut out = vec![0u8; mac.mac_size()];
    let written = mac.do_final(&mut out).unwrap();
    assert_eq!(written, out.len());
    out
}

fuzz_target!(|data: &[u8]| {
    // First byte picks the split point of the message that follows
    let Some((&split, message)) = data.split_first() else {
        return;
    };
    let at = usize::from(split) % (message.len() + 1);
    let (head, tail) = message.split_at(at);

    let mut macs: Vec<Box<dyn Mac>> = vec![
        Box::new(CbcBlockCipherMac::new(DesEngine::new())),
        Box::new(CfbBlockCipherMac::new(DesEngine::new())),
        Box::new(HMac::<Sha256>::new()),
    ];
    if let Ok(poly) = PolyMac128::<AesEngine>::new(AesEngine::new()) {
        macs.push(Box::new(poly));
    }

    for mac in &mut macs {
        let key = if mac.algorithm_name().starts_with("DES") { &KEY[..8] } else { &KEY[..] };
        mac.init(key).unwrap();
        let whole = tag(mac.as_mut(), &[message]);
        let split = tag(mac.as_mut(), &[head, tail]);
        assert_eq!(whole, split);
    }
});
