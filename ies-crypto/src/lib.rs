#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod agreement;
pub mod engines;
pub mod ies;
pub mod kdf;
pub mod kgcm;
pub mod macs;
pub mod modes;
pub mod paddings;

mod error;
mod utils;

// RE-EXPORTS
// ================================================================================================

pub use engines::{BlockCipher, Direction};
pub use error::CryptoError;
pub use macs::Mac;
pub use modes::BlockCipherMode;

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {

    #[test]
    #[should_panic]
    fn debug_assert_is_checked() {
        // enforce the release checks to always have `RUSTFLAGS="-C debug-assertions"`.
        //
        // the block and field code relies on `debug_assert` for slice length checks, and we want
        // those checks to run downstream.
        debug_assert!(false);
    }

    #[test]
    #[should_panic]
    #[allow(arithmetic_overflow)]
    fn overflow_panics_for_test() {
        // overflows might be disabled if tests are performed in release mode. buffer offsets in
        // the modes and MACs are plain arithmetic, so the tests must run with overflow checks.
        //
        // to enable overflow checks in release mode, ensure `RUSTFLAGS="-C overflow-checks"`
        let a = 1_u64;
        let b = 64;
        assert_ne!(a << b, 0);
    }
}
