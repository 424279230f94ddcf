use alloc::{string::String, vec::Vec};

use super::{BlockBuffer, Mac, MacPadding, check_mac_output, mac_size_from_bits};
use crate::{BlockCipher, BlockCipherMode, CryptoError, Direction, modes::CbcBlockCipher};

/// CBC-MAC (FIPS 113 data authentication code when used with DES).
///
/// The message is CBC-encrypted under the key and the tag is the leftmost `mac_size` bytes of the
/// last ciphertext block. The tag length defaults to half the cipher block.
#[derive(Debug)]
pub struct CbcBlockCipherMac<B: BlockCipher> {
    cipher: CbcBlockCipher<B>,
    buffer: BlockBuffer,
    mac_block: Vec<u8>,
    mac_size: usize,
    padding: MacPadding,
    keyed: bool,
}

impl<B: BlockCipher> CbcBlockCipherMac<B> {
    pub fn new(cipher: B) -> Self {
        let block_size = cipher.block_size();
        Self::build(cipher, block_size / 2, MacPadding::ZeroFill)
    }

    pub fn with_padding(cipher: B, padding: MacPadding) -> Self {
        let block_size = cipher.block_size();
        Self::build(cipher, block_size / 2, padding)
    }

    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] unless `mac_size_bits` is a whole number of bytes
    /// between 8 bits and the cipher block size.
    pub fn with_config(
        cipher: B,
        mac_size_bits: usize,
        padding: MacPadding,
    ) -> Result<Self, CryptoError> {
        let mac_size = mac_size_from_bits(mac_size_bits, cipher.block_size())?;
        Ok(Self::build(cipher, mac_size, padding))
    }

    fn build(cipher: B, mac_size: usize, padding: MacPadding) -> Self {
        let block_size = cipher.block_size();
        Self {
            cipher: CbcBlockCipher::new(cipher),
            buffer: BlockBuffer::new(block_size),
            mac_block: vec![0; block_size],
            mac_size,
            padding,
            keyed: false,
        }
    }

    /// Keys the MAC with an explicit chaining IV instead of the zero block.
    pub fn init_with_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), CryptoError> {
        self.keyed = false;
        self.cipher.init(Direction::Encrypt, key, Some(iv))?;
        self.keyed = true;
        self.reset();
        Ok(())
    }

    fn ensure_keyed(&self) -> Result<(), CryptoError> {
        if !self.keyed {
            return Err(CryptoError::IllegalState("CBC-MAC not initialised"));
        }
        Ok(())
    }
}

impl<B: BlockCipher> Mac for CbcBlockCipherMac<B> {
    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        self.keyed = false;
        self.cipher.init(Direction::Encrypt, key, None)?;
        self.keyed = true;
        self.reset();
        Ok(())
    }

    fn mac_size(&self) -> usize {
        self.mac_size
    }

    fn update(&mut self, input: &[u8]) -> Result<(), CryptoError> {
        self.ensure_keyed()?;
        let (cipher, out) = (&mut self.cipher, &mut self.mac_block);
        self.buffer.update(input, |block| cipher.process_block(block, &mut out[..]).map(drop))
    }

    fn do_final(&mut self, out: &mut [u8]) -> Result<usize, CryptoError> {
        check_mac_output(out, self.mac_size)?;
        self.ensure_keyed()?;

        let (cipher, mac_block) = (&mut self.cipher, &mut self.mac_block);
        self.buffer.finish(&self.padding, |block| {
            cipher.process_block(block, &mut mac_block[..]).map(drop)
        })?;
        out[..self.mac_size].copy_from_slice(&self.mac_block[..self.mac_size]);

        self.reset();
        Ok(self.mac_size)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.mac_block.fill(0);
        self.cipher.reset();
    }

    fn clear(&mut self) {
        self.reset();
        self.keyed = false;
        self.cipher.clear();
    }

    fn algorithm_name(&self) -> String {
        match self.padding.name() {
            Some(padding) => format!("{}/CBC-MAC/{padding}", self.cipher.underlying_algorithm()),
            None => format!("{}/CBC-MAC", self.cipher.underlying_algorithm()),
        }
    }
}
