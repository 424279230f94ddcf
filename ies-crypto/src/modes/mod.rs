//! Chaining modes over a [`BlockCipher`](crate::BlockCipher).
//!
//! A mode owns the running feedback register. It is created uninitialised, becomes ready after
//! [`BlockCipherMode::init`], and processes blocks strictly in order. [`BlockCipherMode::reset`]
//! puts the register back to the IV without rescheduling the key.

use alloc::string::String;
use core::fmt;

use crate::{CryptoError, Direction};

mod cbc;
mod cfb;
mod padded;

#[cfg(test)]
mod tests;

pub use cbc::CbcBlockCipher;
pub use cfb::CfbBlockCipher;
pub use padded::PaddedBlockCipher;

// MODE TRAIT
// ================================================================================================

/// A block cipher mode of operation.
pub trait BlockCipherMode: fmt::Debug {
    /// Keys the underlying transform and loads the feedback register with `iv`, or with zeros
    /// when `iv` is `None`.
    ///
    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] if the IV is not exactly one cipher block, or the
    /// key error of the underlying transform.
    fn init(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: Option<&[u8]>,
    ) -> Result<(), CryptoError>;

    /// Number of bytes consumed and produced by one call to [`BlockCipherMode::process_block`].
    fn block_size(&self) -> usize;

    /// Processes one mode block from the front of `input` into the front of `output`.
    ///
    /// # Errors
    /// Returns [`CryptoError::DataLength`] if either slice is shorter than one block and
    /// [`CryptoError::IllegalState`] before [`BlockCipherMode::init`].
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError>;

    /// Restores the feedback register to the IV.
    fn reset(&mut self);

    /// Forgets the key and IV. The mode must be initialised again before use.
    fn clear(&mut self);

    /// Name of the underlying block transform, e.g. `"AES"`.
    fn underlying_algorithm(&self) -> &'static str;

    /// Name of the mode including its transform, e.g. `"AES/CBC"`.
    fn algorithm_name(&self) -> String;
}

/// Copies `iv` into `target`, or zeroes `target` when no IV is supplied.
fn load_iv(target: &mut [u8], iv: Option<&[u8]>) -> Result<(), CryptoError> {
    match iv {
        Some(iv) if iv.len() != target.len() => {
            Err(CryptoError::IllegalArgument("IV must be the same length as the block size"))
        },
        Some(iv) => {
            target.copy_from_slice(iv);
            Ok(())
        },
        None => {
            target.fill(0);
            Ok(())
        },
    }
}
