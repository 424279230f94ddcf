//! Fixed-block-size symmetric transforms.
//!
//! Every engine implements [`BlockCipher`]: after [`BlockCipher::init`] schedules a key for one
//! [`Direction`], [`BlockCipher::process_block`] maps exactly one block of input to one block of
//! output. Engines keep no state between blocks; chaining lives in [`crate::modes`].

use core::fmt;

use crate::CryptoError;

mod aes;
mod des;


pub use self::{
    aes::AesEngine,
    des::{DesEdeEngine, DesEngine},
};

// DIRECTION
// ================================================================================================

/// Which way a transform is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

// BLOCK CIPHER TRAIT
// ================================================================================================

/// A block transform such as AES or DES.
pub trait BlockCipher: fmt::Debug {
    /// Schedules `key` for `direction`.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidKeyLength`] if the engine does not support the key length.
    fn init(&mut self, direction: Direction, key: &[u8]) -> Result<(), CryptoError>;

    /// Block size in bytes. Valid before [`BlockCipher::init`].
    fn block_size(&self) -> usize;

    /// Transforms the first block of `input` into the first block of `output`, returning the
    /// number of bytes written.
    ///
    /// # Errors
    /// Returns [`CryptoError::DataLength`] if either slice is shorter than one block, and
    /// [`CryptoError::IllegalState`] if no key has been scheduled.
    fn process_block(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError>;

    /// Drops the key schedule. [`BlockCipher::process_block`] fails until the next `init`.
    fn clear(&mut self);

    fn algorithm_name(&self) -> &'static str;
}

impl<B: BlockCipher + ?Sized> BlockCipher for alloc::boxed::Box<B> {
    fn init(&mut self, direction: Direction, key: &[u8]) -> Result<(), CryptoError> {
        (**self).init(direction, key)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn process_block(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        (**self).process_block(input, output)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn algorithm_name(&self) -> &'static str {
        (**self).algorithm_name()
    }
}
