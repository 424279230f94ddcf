//! Multiplication by a fixed element H in GF(2^128), the core of the KGCM authentication
//! function.
//!
//! A multiplier is keyed once with [`KgcmMultiplier::init`] and then maps `z` to `z · H` in
//! place. The accumulator is always the left operand. Before `init` the multiplier behaves as if
//! H were zero.

mod basic;
mod tables;
pub mod util;

#[cfg(test)]
mod tests;

pub use basic::BasicKgcmMultiplier128;
pub use tables::Tables8kKgcmMultiplier128;

/// Multiplication by a fixed field element.
pub trait KgcmMultiplier {
    /// Fixes the multiplicand H.
    fn init(&mut self, h: &[u64; 2]);

    /// Replaces `z` with `z · H`.
    fn multiply_h(&self, z: &mut [u64; 2]);
}
