use alloc::{string::String, vec::Vec};

use super::{BlockBuffer, Mac, MacPadding, check_mac_output, mac_size_from_bits};
use crate::{BlockCipher, BlockCipherMode, CryptoError, Direction, modes::CfbBlockCipher};

/// CFB-MAC (the FIPS 113 CFB variant).
///
/// The message is CFB-encrypted segment by segment. After the final segment the feedback register
/// is encrypted once more and the tag is the leftmost `mac_size` bytes of that block. Defaults to
/// 8-bit segments and a tag of half the cipher block.
#[derive(Debug)]
pub struct CfbBlockCipherMac<B: BlockCipher> {
    cipher: CfbBlockCipher<B>,
    buffer: BlockBuffer,
    segment_out: Vec<u8>,
    mac_block: Vec<u8>,
    mac_size: usize,
    padding: MacPadding,
    keyed: bool,
}

impl<B: BlockCipher> CfbBlockCipherMac<B> {
    pub fn new(cipher: B) -> Self {
        let block_size = cipher.block_size();
        let cfb = CfbBlockCipher::with_segment(cipher, 1);
        Self::build(cfb, block_size, block_size / 2, MacPadding::ZeroFill)
    }

    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] for an unsupported CFB segment size or a tag size
    /// that is not a whole number of bytes between 8 bits and the cipher block size.
    pub fn with_config(
        cipher: B,
        cfb_bits: usize,
        mac_size_bits: usize,
        padding: MacPadding,
    ) -> Result<Self, CryptoError> {
        let block_size = cipher.block_size();
        let mac_size = mac_size_from_bits(mac_size_bits, block_size)?;
        let cfb = CfbBlockCipher::new(cipher, cfb_bits)?;
        Ok(Self::build(cfb, block_size, mac_size, padding))
    }

    fn build(
        cipher: CfbBlockCipher<B>,
        block_size: usize,
        mac_size: usize,
        padding: MacPadding,
    ) -> Self {
        let segment = cipher.block_size();
        Self {
            cipher,
            buffer: BlockBuffer::new(segment),
            segment_out: vec![0; segment],
            mac_block: vec![0; block_size],
            mac_size,
            padding,
            keyed: false,
        }
    }

    /// Keys the MAC with an explicit feedback IV instead of the zero block.
    pub fn init_with_iv(&mut self, key: &[u8], iv: &[u8]) -> Result<(), CryptoError> {
        self.keyed = false;
        self.cipher.init(Direction::Encrypt, key, Some(iv))?;
        self.keyed = true;
        self.reset();
        Ok(())
    }

    fn ensure_keyed(&self) -> Result<(), CryptoError> {
        if !self.keyed {
            return Err(CryptoError::IllegalState("CFB-MAC not initialised"));
        }
        Ok(())
    }
}

impl<B: BlockCipher> Mac for CfbBlockCipherMac<B> {
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
        let (cipher, out) = (&mut self.cipher, &mut self.segment_out);
        self.buffer.update(input, |segment| cipher.process_block(segment, &mut out[..]).map(drop))
    }

    fn do_final(&mut self, out: &mut [u8]) -> Result<usize, CryptoError> {
        check_mac_output(out, self.mac_size)?;
        self.ensure_keyed()?;

        let (cipher, segment_out) = (&mut self.cipher, &mut self.segment_out);
        self.buffer.finish(&self.padding, |segment| {
            cipher.process_block(segment, &mut segment_out[..]).map(drop)
        })?;
        self.cipher.mac_block(&mut self.mac_block)?;
        out[..self.mac_size].copy_from_slice(&self.mac_block[..self.mac_size]);

        self.reset();
        Ok(self.mac_size)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.segment_out.fill(0);
        self.mac_block.fill(0);
        self.cipher.reset();
    }

    fn clear(&mut self) {
        self.reset();
        self.keyed = false;
        self.cipher.clear();
    }

    fn algorithm_name(&self) -> String {
        let base = format!(
            "{}/CFB{}-MAC",
            self.cipher.underlying_algorithm(),
            self.cipher.segment_bits()
        );
        match self.padding.name() {
            Some(padding) => format!("{base}/{padding}"),
            None => base,
        }
    }
}
