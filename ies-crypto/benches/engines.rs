//! Throughput of the block modes, MACs, derivation function and IES presets.
//!
//! Each group runs its primitive over the message sizes in `MESSAGE_SIZES`. The IES group also
//! pays for the key agreement on every call, so it is dominated by curve arithmetic for short
//! messages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ies_crypto::{
    BlockCipherMode, Direction, Mac,
    agreement::{Curve, SecretKey},
    engines::{AesEngine, DesEngine},
    ies::{Ecies, IesKeys},
    kdf::{DerivationFunction, KdfBytesGenerator},
    kgcm::{BasicKgcmMultiplier128, Tables8kKgcmMultiplier128},
    macs::{CbcBlockCipherMac, HMac, PolyMac128},
    modes::{CbcBlockCipher, CfbBlockCipher},
};
use rand_chacha::{ChaCha20Rng, rand_core::SeedableRng};
use sha2::Sha256;

const MESSAGE_SIZES: [usize; 3] = [64, 1024, 16 * 1024];
const KEY: [u8; 16] = [0x2b; 16];
const IV: [u8; 16] = [0x0f; 16];

fn message(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

// BLOCK MODES
// ================================================================================================

fn run_mode(mode: &mut dyn BlockCipherMode, input: &[u8], output: &mut [u8]) {
    let block_size = mode.block_size();
    for (block, out) in input.chunks_exact(block_size).zip(output.chunks_exact_mut(block_size)) {
        mode.process_block(block, out).unwrap();
    }
    mode.reset();
}

fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("modes");
    for size in MESSAGE_SIZES {
        let input = message(size);
        let mut output = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        let mut cbc = CbcBlockCipher::new(AesEngine::new());
        cbc.init(Direction::Encrypt, &KEY, Some(&IV)).unwrap();
        group.bench_with_input(BenchmarkId::new("aes_cbc", size), &input, |b, input| {
            b.iter(|| run_mode(&mut cbc, black_box(input), &mut output))
        });

        let mut cfb8 = CfbBlockCipher::new(AesEngine::new(), 8).unwrap();
        cfb8.init(Direction::Encrypt, &KEY, Some(&IV)).unwrap();
        group.bench_with_input(BenchmarkId::new("aes_cfb8", size), &input, |b, input| {
            b.iter(|| run_mode(&mut cfb8, black_box(input), &mut output))
        });
    }
    group.finish();
}

// MACS
// ================================================================================================

fn run_mac(mac: &mut dyn Mac, input: &[u8]) -> Vec<u8> {
    let mut tag = vec![0u8; mac.mac_size()];
    mac.update(input).unwrap();
    mac.do_final(&mut tag).unwrap();
    tag
}

fn bench_macs(c: &mut Criterion) {
    let mut group = c.benchmark_group("macs");
    for size in MESSAGE_SIZES {
        let input = message(size);
        group.throughput(Throughput::Bytes(size as u64));

        let mut cbc_mac = CbcBlockCipherMac::new(DesEngine::new());
        cbc_mac.init(&KEY[..8]).unwrap();
        group.bench_with_input(BenchmarkId::new("des_cbc_mac", size), &input, |b, input| {
            b.iter(|| run_mac(&mut cbc_mac, black_box(input)))
        });

        let mut hmac = HMac::<Sha256>::new();
        hmac.init(&KEY).unwrap();
        group.bench_with_input(BenchmarkId::new("hmac_sha256", size), &input, |b, input| {
            b.iter(|| run_mac(&mut hmac, black_box(input)))
        });

        let mut tables: PolyMac128<AesEngine, Tables8kKgcmMultiplier128> =
            PolyMac128::new(AesEngine::new()).unwrap();
        tables.init_with_nonce(&KEY, &IV).unwrap();
        group.bench_with_input(BenchmarkId::new("poly_mac_tables", size), &input, |b, input| {
            b.iter(|| run_mac(&mut tables, black_box(input)))
        });

        let mut basic: PolyMac128<AesEngine, BasicKgcmMultiplier128> =
            PolyMac128::new(AesEngine::new()).unwrap();
        basic.init_with_nonce(&KEY, &IV).unwrap();
        group.bench_with_input(BenchmarkId::new("poly_mac_basic", size), &input, |b, input| {
            b.iter(|| run_mac(&mut basic, black_box(input)))
        });
    }
    group.finish();
}

// KDF
// ================================================================================================

fn bench_kdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdf");
    let kdf = KdfBytesGenerator::<Sha256>::kdf2();
    let shared = [0x42u8; 32];
    for size in MESSAGE_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("kdf2_sha256", size), &size, |b, &size| {
            b.iter(|| kdf.derive(black_box(&shared), b"bench", size).unwrap())
        });
    }
    group.finish();
}

// IES
// ================================================================================================

fn bench_ies(c: &mut Criterion) {
    let mut group = c.benchmark_group("ies");
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let recipient = SecretKey::random(Curve::P256, &mut rng);

    for size in MESSAGE_SIZES {
        let plaintext = message(size);
        group.throughput(Throughput::Bytes(size as u64));

        let mut engine = Ecies::with_aes_cbc();
        let params = engine.default_parameters(Some(&IV));

        group.bench_with_input(BenchmarkId::new("seal_aes_cbc", size), &plaintext, |b, input| {
            b.iter(|| {
                let keys = IesKeys::ephemeral(recipient.public_key(), &params, &mut rng);
                engine.init(Direction::Encrypt, keys, params.clone()).unwrap();
                engine.process_block(black_box(input)).unwrap()
            })
        });

        let keys = IesKeys::ephemeral(recipient.public_key(), &params, &mut rng);
        engine.init(Direction::Encrypt, keys, params.clone()).unwrap();
        let envelope = engine.process_block(&plaintext).unwrap();

        group.bench_with_input(BenchmarkId::new("open_aes_cbc", size), &envelope, |b, input| {
            b.iter(|| {
                let keys = IesKeys::Recipient { private: recipient.clone() };
                engine.init(Direction::Decrypt, keys, params.clone()).unwrap();
                engine.process_block(black_box(input)).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(engine_benches, bench_modes, bench_macs, bench_kdf, bench_ies);
criterion_main!(engine_benches);
