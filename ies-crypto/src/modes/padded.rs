use alloc::{boxed::Box, string::String, vec::Vec};

use super::BlockCipherMode;
use crate::{
    CryptoError, Direction,
    paddings::{BlockPadding, Pkcs7Padding},
};

/// A chaining mode with a padding scheme, used over whole buffers.
///
/// Encryption always pads, so a block-aligned plaintext gains one full padding block. Decryption
/// requires a non-empty block-aligned ciphertext and strips the padding from the last block. The
/// mode register is reset after each [`PaddedBlockCipher::do_final`], whether it succeeded or not.
#[derive(Debug)]
pub struct PaddedBlockCipher {
    mode: Box<dyn BlockCipherMode>,
    padding: Box<dyn BlockPadding>,
    direction: Option<Direction>,
}

impl PaddedBlockCipher {
    /// Wraps `mode` with PKCS#7 padding.
    pub fn new(mode: Box<dyn BlockCipherMode>) -> Self {
        Self::with_padding(mode, Box::new(Pkcs7Padding))
    }

    pub fn with_padding(mode: Box<dyn BlockCipherMode>, padding: Box<dyn BlockPadding>) -> Self {
        Self { mode, padding, direction: None }
    }

    pub fn init(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        self.mode.init(direction, key, iv)?;
        self.direction = Some(direction);
        Ok(())
    }

    pub fn block_size(&self) -> usize {
        self.mode.block_size()
    }

    /// Upper bound on the output of [`PaddedBlockCipher::do_final`] for `len` input bytes.
    pub fn output_size(&self, len: usize) -> usize {
        let block_size = self.mode.block_size();
        match self.direction {
            Some(Direction::Decrypt) => len,
            _ => (len / block_size + 1) * block_size,
        }
    }

    /// Encrypts or decrypts the whole of `input`.
    ///
    /// # Errors
    /// Returns [`CryptoError::IllegalState`] before `init`, [`CryptoError::DataLength`] for a
    /// ciphertext that is empty or not block aligned and [`CryptoError::InvalidCipherText`] for
    /// malformed padding.
    pub fn do_final(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let direction =
            self.direction.ok_or(CryptoError::IllegalState("padded cipher not initialised"))?;
        let result = match direction {
            Direction::Encrypt => self.encrypt(input),
            Direction::Decrypt => self.decrypt(input),
        };
        self.mode.reset();
        result
    }

    /// Forgets the key. [`PaddedBlockCipher::do_final`] fails until the next `init`.
    pub fn clear(&mut self) {
        self.mode.clear();
        self.direction = None;
    }

    pub fn underlying_algorithm(&self) -> &'static str {
        self.mode.underlying_algorithm()
    }

    pub fn algorithm_name(&self) -> String {
        format!("{}/{}Padding", self.mode.algorithm_name(), self.padding.name())
    }

    fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let block_size = self.mode.block_size();
        let mut output = vec![0u8; self.output_size(input.len())];

        let blocks = input.chunks_exact(block_size);
        let tail = blocks.remainder();
        let mut written = 0;
        for block in blocks {
            written += self.mode.process_block(block, &mut output[written..])?;
        }

        let mut last = vec![0u8; block_size];
        last[..tail.len()].copy_from_slice(tail);
        self.padding.add_padding(&mut last, tail.len());
        written += self.mode.process_block(&last, &mut output[written..])?;

        debug_assert_eq!(written, output.len());
        Ok(output)
    }

    fn decrypt(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let block_size = self.mode.block_size();
        if input.is_empty() || input.len() % block_size != 0 {
            return Err(CryptoError::DataLength("ciphertext not a whole number of blocks"));
        }

        let mut output = vec![0u8; input.len()];
        let blocks = input.chunks_exact(block_size);
        for (block, out) in blocks.zip(output.chunks_exact_mut(block_size)) {
            self.mode.process_block(block, out)?;
        }

        let pad = self.padding.pad_count(&output[input.len() - block_size..])?;
        output.truncate(input.len() - pad);
        Ok(output)
    }
}
