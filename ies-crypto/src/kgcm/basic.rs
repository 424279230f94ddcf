use core::fmt;

use zeroize::Zeroize;

use super::{KgcmMultiplier, util};

/// Bitwise shift-and-add multiplier. Slow, constant time, no precomputation.
#[derive(Clone, Default)]
pub struct BasicKgcmMultiplier128 {
    h: [u64; 2],
}

impl fmt::Debug for BasicKgcmMultiplier128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicKgcmMultiplier128").finish_non_exhaustive()
    }
}

impl KgcmMultiplier for BasicKgcmMultiplier128 {
    fn init(&mut self, h: &[u64; 2]) {
        self.h = *h;
    }

    fn multiply_h(&self, z: &mut [u64; 2]) {
        *z = util::multiply(z, &self.h);
    }
}

impl Drop for BasicKgcmMultiplier128 {
    fn drop(&mut self) {
        self.h.zeroize();
    }
}
