use proptest::prelude::*;
use rstest::rstest;

use super::{util::*, *};

const X: [u64; 2] = [0xfedcba9876543210, 0x0123456789abcdef];
const H: [u64; 2] = [0x884cfa59ca342b2e, 0x66e94bd4ef8a2c3b];
const X_TIMES_H: [u64; 2] = [0x991cfb0ff159b7e0, 0x2e7e2fd95e3bb72e];
const X_TIMES_H_CUBED: [u64; 2] = [0x7d108cbd9eac293c, 0x8bb4259f23ba8764];

/// Schoolbook carry-less product into 256 bits followed by bit-serial reduction.
fn reference_multiply(x: &[u64; 2], y: &[u64; 2]) -> [u64; 2] {
    let a = u128::from(x[0]) | (u128::from(x[1]) << 64);
    let b = u128::from(y[0]) | (u128::from(y[1]) << 64);
    let (mut lo, mut hi) = (0u128, 0u128);
    for i in 0..128 {
        if (b >> i) & 1 == 1 {
            lo ^= a << i;
            if i > 0 {
                hi ^= a >> (128 - i);
            }
        }
    }
    // fold each high bit x^(128 + i) back as x^i * (x^7 + x^2 + x + 1)
    for i in (0..128).rev() {
        if (hi >> i) & 1 == 1 {
            hi ^= 1 << i;
            let folded = 0x87u128;
            lo ^= folded << i;
            if i > 120 {
                hi ^= folded >> (128 - i);
            }
        }
    }
    [lo as u64, (lo >> 64) as u64]
}

fn element() -> impl Strategy<Value = [u64; 2]> {
    prop::array::uniform2(any::<u64>())
}

fn multipliers(h: &[u64; 2]) -> (BasicKgcmMultiplier128, Tables8kKgcmMultiplier128) {
    let mut basic = BasicKgcmMultiplier128::default();
    let mut tables = Tables8kKgcmMultiplier128::default();
    basic.init(h);
    tables.init(h);
    (basic, tables)
}

#[test]
fn known_product() {
    assert_eq!(multiply(&X, &H), X_TIMES_H);
    assert_eq!(reference_multiply(&X, &H), X_TIMES_H);

    let (basic, tables) = multipliers(&H);
    for multiplier in [&basic as &dyn KgcmMultiplier, &tables] {
        let mut z = X;
        multiplier.multiply_h(&mut z);
        assert_eq!(z, X_TIMES_H);
    }
}

#[test]
fn repeated_multiplication_by_h() {
    let h_cubed = multiply(&square(&H), &H);
    assert_eq!(multiply(&X, &h_cubed), X_TIMES_H_CUBED);

    let (_, tables) = multipliers(&H);
    let mut z = X;
    for _ in 0..3 {
        tables.multiply_h(&mut z);
    }
    assert_eq!(z, X_TIMES_H_CUBED);
}

#[rstest]
#[case::low_bit([1, 0], [2, 0])]
#[case::word_carry([1 << 63, 0], [0, 1])]
#[case::reduction([0, 1 << 63], [0x87, 0])]
fn multiply_by_x(#[case] input: [u64; 2], #[case] expected: [u64; 2]) {
    assert_eq!(multiply_x(&input), expected);
    assert_eq!(multiply(&input, &[2, 0]), expected);
}

#[test]
fn byte_conversion_is_little_endian() {
    let mut bytes = [0u8; 16];
    bytes[0] = 0x01;
    bytes[15] = 0x80;
    assert_eq!(from_le_bytes(&bytes), [1, 1 << 63]);
    assert_eq!(to_le_bytes(&from_le_bytes(&bytes)), bytes);
}

#[test]
fn uninitialised_multiplier_annihilates() {
    let mut z = X;
    Tables8kKgcmMultiplier128::default().multiply_h(&mut z);
    assert_eq!(z, zero());
}

proptest! {
    #[test]
    fn multipliers_agree_with_reference(h in element(), z in element()) {
        let expected = reference_multiply(&z, &h);
        prop_assert_eq!(multiply(&z, &h), expected);

        let (basic, tables) = multipliers(&h);
        let (mut a, mut b) = (z, z);
        basic.multiply_h(&mut a);
        tables.multiply_h(&mut b);
        prop_assert_eq!(a, expected);
        prop_assert_eq!(b, expected);
    }

    #[test]
    fn field_laws(a in element(), b in element(), c in element()) {
        prop_assert_eq!(multiply(&multiply(&a, &b), &c), multiply(&a, &multiply(&b, &c)));
        prop_assert_eq!(multiply(&a, &b), multiply(&b, &a));
        prop_assert_eq!(multiply(&a, &add(&b, &c)), add(&multiply(&a, &b), &multiply(&a, &c)));
        prop_assert_eq!(multiply(&a, &one()), a);
        prop_assert_eq!(multiply(&a, &zero()), zero());
        prop_assert_eq!(square(&a), multiply(&a, &a));
    }
}
