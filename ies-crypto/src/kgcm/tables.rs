use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use zeroize::Zeroize;

use super::{KgcmMultiplier, util};

const NIBBLES: usize = 32;

type Row = [[u64; 2]; 16];

/// Table-driven multiplier: 32 rows of 16 entries, `T[j][n] = H · n · x^(4j)`, 8 KiB on the heap.
///
/// A product is the XOR of one entry per nibble of `z`. The table index depends on `z`, so the
/// memory access pattern is not independent of the data.
#[derive(Clone)]
pub struct Tables8kKgcmMultiplier128 {
    table: Box<[Row]>,
}

impl Default for Tables8kKgcmMultiplier128 {
    fn default() -> Self {
        Self { table: vec![[[0u64; 2]; 16]; NIBBLES].into_boxed_slice() }
    }
}

impl fmt::Debug for Tables8kKgcmMultiplier128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tables8kKgcmMultiplier128").finish_non_exhaustive()
    }
}

impl KgcmMultiplier for Tables8kKgcmMultiplier128 {
    fn init(&mut self, h: &[u64; 2]) {
        let mut rows: Vec<Row> = Vec::with_capacity(NIBBLES);
        let mut base = *h;
        for _ in 0..NIBBLES {
            let mut row = [[0u64; 2]; 16];
            row[1] = base;
            for n in (2..16).step_by(2) {
                row[n] = util::multiply_x(&row[n / 2]);
                row[n + 1] = util::add(&row[n], &base);
            }
            base = util::multiply_x(&row[8]);
            rows.push(row);
        }
        self.table.zeroize();
        self.table = rows.into_boxed_slice();
        let bytes = NIBBLES * 16 * 16;
        tracing::trace!(rows = NIBBLES, bytes, "built KGCM multiplication table");
    }

    fn multiply_h(&self, z: &mut [u64; 2]) {
        let mut acc = util::zero();
        for (j, row) in self.table.iter().enumerate() {
            let nibble = (z[j / 16] >> ((j % 16) * 4)) & 0xf;
            acc = util::add(&acc, &row[nibble as usize]);
        }
        *z = acc;
    }
}

impl Drop for Tables8kKgcmMultiplier128 {
    fn drop(&mut self) {
        self.table.zeroize();
    }
}
