//! Arithmetic on GF(2^128) elements stored as little-endian `[low, high]` word pairs.
//!
//! Bit `i` of the polynomial is bit `i % 64` of word `i / 64`; the field is reduced by
//! x^128 + x^7 + x^2 + x + 1.

/// Low word of x^128 mod the field polynomial.
const REDUCTION: u64 = 0x87;

pub const fn zero() -> [u64; 2] {
    [0, 0]
}

pub const fn one() -> [u64; 2] {
    [1, 0]
}

#[inline]
pub fn add(x: &[u64; 2], y: &[u64; 2]) -> [u64; 2] {
    [x[0] ^ y[0], x[1] ^ y[1]]
}

/// Multiplies `x` by the polynomial `x`.
#[inline]
pub fn multiply_x(x: &[u64; 2]) -> [u64; 2] {
    let carry = x[1] >> 63;
    [(x[0] << 1) ^ (carry.wrapping_neg() & REDUCTION), (x[1] << 1) | (x[0] >> 63)]
}

/// Full field multiplication. Runs in constant time with respect to both operands.
pub fn multiply(x: &[u64; 2], y: &[u64; 2]) -> [u64; 2] {
    let mut acc = zero();
    let mut power = *x;
    for word in y {
        for bit in 0..64 {
            let mask = ((word >> bit) & 1).wrapping_neg();
            acc[0] ^= power[0] & mask;
            acc[1] ^= power[1] & mask;
            power = multiply_x(&power);
        }
    }
    acc
}

pub fn square(x: &[u64; 2]) -> [u64; 2] {
    multiply(x, x)
}

pub fn from_le_bytes(bytes: &[u8; 16]) -> [u64; 2] {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&bytes[..8]);
    hi.copy_from_slice(&bytes[8..]);
    [u64::from_le_bytes(lo), u64::from_le_bytes(hi)]
}

pub fn to_le_bytes(x: &[u64; 2]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&x[0].to_le_bytes());
    out[8..].copy_from_slice(&x[1].to_le_bytes());
    out
}
