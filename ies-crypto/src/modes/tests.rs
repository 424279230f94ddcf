use alloc::{boxed::Box, vec::Vec};

use assert_matches::assert_matches;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{
    engines::{AesEngine, DesEngine},
    paddings::Iso7816d4Padding,
};

// NIST SP 800-38A, F.2.1 / F.3.7 / F.3.13 (first two blocks)
const KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const IV: &str = "000102030405060708090a0b0c0d0e0f";
const PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51";

fn run(mode: &mut dyn BlockCipherMode, direction: Direction, input: &[u8]) -> Vec<u8> {
    let key = hex::decode(KEY).unwrap();
    let iv = hex::decode(IV).unwrap();
    mode.init(direction, &key, Some(&iv)).unwrap();

    let block_size = mode.block_size();
    let mut out = vec![0u8; input.len()];
    for (block, chunk) in input.chunks(block_size).zip(out.chunks_mut(block_size)) {
        assert_eq!(mode.process_block(block, chunk).unwrap(), block_size);
    }
    out
}

#[rstest]
#[case::cbc(
    Box::new(CbcBlockCipher::new(AesEngine::new())) as Box<dyn BlockCipherMode>,
    Box::new(CbcBlockCipher::new(AesEngine::new())) as Box<dyn BlockCipherMode>,
    "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"
)]
#[case::cfb128(
    Box::new(CfbBlockCipher::full_block(AesEngine::new())) as Box<dyn BlockCipherMode>,
    Box::new(CfbBlockCipher::full_block(AesEngine::new())) as Box<dyn BlockCipherMode>,
    "3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b"
)]
#[case::cfb8(
    Box::new(CfbBlockCipher::new(AesEngine::new(), 8).unwrap()) as Box<dyn BlockCipherMode>,
    Box::new(CfbBlockCipher::new(AesEngine::new(), 8).unwrap()) as Box<dyn BlockCipherMode>,
    "3b79424c9c0dd436bace9e0ed4586a4f32b9ded50ae3ba69d472e88267fb5052"
)]
fn aes_sp800_38a_vectors(
    #[case] mut encryptor: Box<dyn BlockCipherMode>,
    #[case] mut decryptor: Box<dyn BlockCipherMode>,
    #[case] expected: &str,
) {
    let plaintext = hex::decode(PLAINTEXT).unwrap();
    let ciphertext = run(encryptor.as_mut(), Direction::Encrypt, &plaintext);
    assert_eq!(hex::encode(&ciphertext), expected);

    let recovered = run(decryptor.as_mut(), Direction::Decrypt, &ciphertext);
    assert_eq!(recovered, plaintext);
}

#[test]
fn reset_restores_the_iv() {
    let plaintext = hex::decode(PLAINTEXT).unwrap();
    let mut mode = CbcBlockCipher::new(AesEngine::new());
    let first = run(&mut mode, Direction::Encrypt, &plaintext);

    mode.reset();
    assert_eq!(mode.register(), hex::decode(IV).unwrap().as_slice());
    let mut again = vec![0u8; 16];
    mode.process_block(&plaintext, &mut again).unwrap();
    assert_eq!(again, first[..16]);
}

#[test]
fn missing_iv_means_zero_iv() {
    let key = hex::decode(KEY).unwrap();
    let mut implicit = CbcBlockCipher::new(AesEngine::new());
    let mut explicit = CbcBlockCipher::new(AesEngine::new());
    implicit.init(Direction::Encrypt, &key, None).unwrap();
    explicit.init(Direction::Encrypt, &key, Some(&[0u8; 16])).unwrap();

    let (mut a, mut b) = ([0u8; 16], [0u8; 16]);
    implicit.process_block(&[7u8; 16], &mut a).unwrap();
    explicit.process_block(&[7u8; 16], &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn mode_state_errors() {
    let mut mode = CbcBlockCipher::new(AesEngine::new());
    let mut out = [0u8; 16];
    assert_matches!(mode.process_block(&[0u8; 16], &mut out), Err(CryptoError::IllegalState(_)));
    assert_matches!(
        mode.init(Direction::Encrypt, &[0u8; 16], Some(&[0u8; 8])),
        Err(CryptoError::IllegalArgument(_))
    );

    mode.init(Direction::Encrypt, &[0u8; 16], None).unwrap();
    assert_matches!(mode.process_block(&[0u8; 15], &mut out), Err(CryptoError::DataLength(_)));
}

#[test]
fn cbc_register_carries_the_last_ciphertext_block() {
    let plaintext = hex::decode(PLAINTEXT).unwrap();
    let mut mode = CbcBlockCipher::new(AesEngine::new());
    let ciphertext = run(&mut mode, Direction::Encrypt, &plaintext);
    assert_eq!(mode.register(), &ciphertext[16..]);

    let mut decryptor = CbcBlockCipher::new(AesEngine::new());
    run(&mut decryptor, Direction::Decrypt, &ciphertext);
    assert_eq!(decryptor.register(), &ciphertext[16..]);
}

#[rstest]
#[case(0)]
#[case(12)]
#[case(127)]
#[case(130)]
#[case(136)]
fn unsupported_cfb_segments_are_rejected(#[case] bits: usize) {
    assert_matches!(
        CfbBlockCipher::new(AesEngine::new(), bits),
        Err(CryptoError::IllegalArgument(_))
    );
}

/// Segments that do not divide the block still chain one whole segment per call.
#[rstest]
#[case::cfb72(72)]
#[case::cfb40(40)]
fn odd_cfb_segments_round_trip(#[case] bits: usize) {
    let plaintext: Vec<u8> = (0u8..bits as u8 / 8 * 5).collect();
    let mut encryptor = CfbBlockCipher::new(AesEngine::new(), bits).unwrap();
    let mut decryptor = CfbBlockCipher::new(AesEngine::new(), bits).unwrap();
    assert_eq!(encryptor.block_size(), bits / 8);
    assert_eq!(encryptor.algorithm_name(), format!("AES/CFB{bits}"));

    let ciphertext = run(&mut encryptor, Direction::Encrypt, &plaintext);
    assert_ne!(ciphertext, plaintext);
    // the first segment only depends on the IV, so it matches full-block CFB
    let mut full_block = CfbBlockCipher::full_block(AesEngine::new());
    let full = run(&mut full_block, Direction::Encrypt, &[0; 16]);
    let keystream: Vec<u8> = plaintext.iter().zip(&full).map(|(p, k)| p ^ k).collect();
    assert_eq!(ciphertext[..bits / 8], keystream[..bits / 8]);

    assert_eq!(run(&mut decryptor, Direction::Decrypt, &ciphertext), plaintext);
}

#[rstest]
#[case::cbc(Box::new(CbcBlockCipher::new(AesEngine::new())) as Box<dyn BlockCipherMode>)]
#[case::cfb(
    Box::new(CfbBlockCipher::new(AesEngine::new(), 72).unwrap()) as Box<dyn BlockCipherMode>
)]
fn clear_forgets_the_key(#[case] mut mode: Box<dyn BlockCipherMode>) {
    let plaintext = hex::decode(PLAINTEXT).unwrap();
    let block_size = mode.block_size();
    let first = run(mode.as_mut(), Direction::Encrypt, &plaintext[..block_size]);

    mode.clear();
    let mut out = vec![0u8; block_size];
    assert_matches!(
        mode.process_block(&plaintext[..block_size], &mut out),
        Err(CryptoError::IllegalState(_))
    );
    assert_eq!(mode.block_size(), block_size);
    assert_eq!(run(mode.as_mut(), Direction::Encrypt, &plaintext[..block_size]), first);
}

#[test]
fn algorithm_names() {
    assert_eq!(CbcBlockCipher::new(AesEngine::new()).algorithm_name(), "AES/CBC");
    assert_eq!(CfbBlockCipher::new(DesEngine::new(), 8).unwrap().algorithm_name(), "DES/CFB8");
    let padded = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(AesEngine::new())));
    assert_eq!(padded.algorithm_name(), "AES/CBC/PKCS7Padding");
    assert_eq!(padded.underlying_algorithm(), "AES");
}

// PADDED CIPHER
// ================================================================================================

fn padded_pair() -> (PaddedBlockCipher, PaddedBlockCipher) {
    let key = hex::decode(KEY).unwrap();
    let iv = hex::decode(IV).unwrap();
    let mut enc = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(AesEngine::new())));
    let mut dec = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(AesEngine::new())));
    enc.init(Direction::Encrypt, &key, Some(&iv)).unwrap();
    dec.init(Direction::Decrypt, &key, Some(&iv)).unwrap();
    (enc, dec)
}

#[test]
fn aligned_plaintext_gains_a_padding_block() {
    let (mut enc, mut dec) = padded_pair();
    let plaintext = hex::decode(PLAINTEXT).unwrap();
    assert_eq!(enc.output_size(32), 48);

    let ciphertext = enc.do_final(&plaintext).unwrap();
    assert_eq!(ciphertext.len(), 48);
    assert_eq!(
        hex::encode(&ciphertext[..32]),
        "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"
    );
    assert_eq!(dec.do_final(&ciphertext).unwrap(), plaintext);
}

#[test]
fn padded_cipher_resets_between_calls() {
    let (mut enc, _) = padded_pair();
    let first = enc.do_final(b"attack at dawn").unwrap();
    let second = enc.do_final(b"attack at dawn").unwrap();
    assert_eq!(first, second);
}

#[test]
fn padded_cipher_rejects_bad_ciphertexts() {
    let (mut enc, mut dec) = padded_pair();
    assert_matches!(dec.do_final(&[]), Err(CryptoError::DataLength(_)));
    assert_matches!(dec.do_final(&[0u8; 17]), Err(CryptoError::DataLength(_)));

    // the final block is all padding; flipping the last byte of the block before it turns the
    // recovered pad byte into 0x11
    let mut ciphertext = enc.do_final(&[0x42u8; 16]).unwrap();
    ciphertext[15] ^= 0x01;
    assert_matches!(dec.do_final(&ciphertext), Err(CryptoError::InvalidCipherText));

    let mut uninit = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(AesEngine::new())));
    assert_matches!(uninit.do_final(&[0u8; 16]), Err(CryptoError::IllegalState(_)));

    enc.clear();
    assert_matches!(enc.do_final(b"cleared"), Err(CryptoError::IllegalState(_)));
}

#[test]
fn iso7816_padding_round_trips_through_cfb() {
    let key = hex::decode(KEY).unwrap();
    let mode = || Box::new(CfbBlockCipher::full_block(AesEngine::new()));
    let mut enc = PaddedBlockCipher::with_padding(mode(), Box::new(Iso7816d4Padding));
    let mut dec = PaddedBlockCipher::with_padding(mode(), Box::new(Iso7816d4Padding));
    enc.init(Direction::Encrypt, &key, None).unwrap();
    dec.init(Direction::Decrypt, &key, None).unwrap();

    let ciphertext = enc.do_final(b"seventeen bytes!!").unwrap();
    assert_eq!(ciphertext.len(), 32);
    assert_eq!(dec.do_final(&ciphertext).unwrap(), b"seventeen bytes!!");
}

proptest! {
    #[test]
    fn padded_cbc_round_trips(plaintext in prop::collection::vec(any::<u8>(), 0..100)) {
        let (mut enc, mut dec) = padded_pair();
        let ciphertext = enc.do_final(&plaintext).unwrap();
        prop_assert_eq!(ciphertext.len(), enc.output_size(plaintext.len()));
        prop_assert_eq!(dec.do_final(&ciphertext).unwrap(), plaintext);
    }
}
