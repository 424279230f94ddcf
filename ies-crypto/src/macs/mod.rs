//! Message authentication codes.
//!
//! The block-cipher MACs share one buffering discipline: input is collected into a buffer one
//! block (or CFB segment) wide, and a full buffer is only handed to the transform once more input
//! arrives. The last block therefore always reaches [`Mac::do_final`], where the configured
//! [`MacPadding`] decides how it is closed.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;

use crate::{CryptoError, paddings::BlockPadding};

mod cbc_mac;
mod cfb_mac;
mod hmac;
mod poly_mac;


pub use self::{
    cbc_mac::CbcBlockCipherMac, cfb_mac::CfbBlockCipherMac, hmac::HMac, poly_mac::PolyMac128,
};

// MAC TRAIT
// ================================================================================================

/// A keyed message authentication code.
///
/// `do_final` leaves the MAC in its post-`init` state, ready for the next message under the same
/// key.
pub trait Mac: fmt::Debug {
    /// # Errors
    /// Returns the key error of the underlying primitive.
    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError>;

    /// Tag length in bytes.
    fn mac_size(&self) -> usize;

    /// # Errors
    /// Returns [`CryptoError::IllegalState`] before `init`.
    fn update(&mut self, input: &[u8]) -> Result<(), CryptoError>;

    /// Writes the tag into the front of `out` and returns its length.
    ///
    /// # Errors
    /// Returns [`CryptoError::DataLength`] if `out` is shorter than [`Mac::mac_size`], checked
    /// before anything else changes, and [`CryptoError::IllegalState`] before `init`.
    fn do_final(&mut self, out: &mut [u8]) -> Result<usize, CryptoError>;

    /// Discards buffered input, keeping the key.
    fn reset(&mut self);

    /// Discards buffered input and the key. The MAC must be initialised again before use.
    fn clear(&mut self);

    fn algorithm_name(&self) -> String;
}

// PADDING POLICY
// ================================================================================================

/// How a block-cipher MAC closes the final block.
#[derive(Debug, Default)]
pub enum MacPadding {
    /// Fill a trailing partial block, or the single block of an empty message, with zero bytes.
    ///
    /// This is the FIPS 113 behaviour. Messages that differ only in trailing zero bytes up to the
    /// next block boundary get the same tag.
    #[default]
    ZeroFill,
    /// No padding: the message length must be a positive multiple of the block size.
    None,
    /// Pad with the given scheme. A message that already fills the buffer gets a whole extra
    /// padding block.
    Scheme(Box<dyn BlockPadding>),
}

impl MacPadding {
    fn name(&self) -> Option<&'static str> {
        match self {
            MacPadding::Scheme(scheme) => Some(scheme.name()),
            _ => None,
        }
    }
}

// BLOCK BUFFER
// ================================================================================================

/// Lazily flushed input buffer of one block.
#[derive(Debug)]
struct BlockBuffer {
    buf: Vec<u8>,
    len: usize,
}

impl BlockBuffer {
    fn new(size: usize) -> Self {
        Self { buf: vec![0; size], len: 0 }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `input`, handing every block that is followed by more data to `process`.
    fn update<F>(&mut self, mut input: &[u8], mut process: F) -> Result<(), CryptoError>
    where
        F: FnMut(&[u8]) -> Result<(), CryptoError>,
    {
        let size = self.buf.len();
        let gap = size - self.len;
        if input.len() > gap {
            self.buf[self.len..].copy_from_slice(&input[..gap]);
            process(&self.buf)?;
            self.len = 0;
            input = &input[gap..];
            while input.len() > size {
                process(&input[..size])?;
                input = &input[size..];
            }
        }
        self.buf[self.len..self.len + input.len()].copy_from_slice(input);
        self.len += input.len();
        Ok(())
    }

    /// Checks that `padding` can close the buffered message without touching any state.
    fn check_final(&self, padding: &MacPadding) -> Result<(), CryptoError> {
        match padding {
            MacPadding::None if self.len != self.buf.len() => {
                Err(CryptoError::DataLength(
                    "message length not a positive multiple of the block size",
                ))
            },
            _ => Ok(()),
        }
    }

    /// Closes the buffered message with `padding` and hands the final block or blocks to
    /// `process`. Leaves the buffer empty.
    fn finish<F>(&mut self, padding: &MacPadding, mut process: F) -> Result<(), CryptoError>
    where
        F: FnMut(&[u8]) -> Result<(), CryptoError>,
    {
        self.check_final(padding)?;
        match padding {
            MacPadding::ZeroFill => self.buf[self.len..].fill(0),
            MacPadding::None => {},
            MacPadding::Scheme(scheme) => {
                if self.len == self.buf.len() {
                    process(&self.buf)?;
                    self.len = 0;
                }
                scheme.add_padding(&mut self.buf, self.len);
            },
        }
        let result = process(&self.buf);
        self.clear();
        result
    }

    fn clear(&mut self) {
        self.buf.fill(0);
        self.len = 0;
    }
}

/// Validates a configured tag length against the transform block size.
fn mac_size_from_bits(bits: usize, block_size: usize) -> Result<usize, CryptoError> {
    if bits % 8 != 0 {
        return Err(CryptoError::IllegalArgument("MAC size must be a multiple of 8 bits"));
    }
    let size = bits / 8;
    if size == 0 || size > block_size {
        return Err(CryptoError::IllegalArgument(
            "MAC size must be between 8 bits and the block size",
        ));
    }
    Ok(size)
}

fn check_mac_output(out: &[u8], mac_size: usize) -> Result<(), CryptoError> {
    if out.len() < mac_size {
        return Err(CryptoError::DataLength("output buffer too short for MAC"));
    }
    Ok(())
}
