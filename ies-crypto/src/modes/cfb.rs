use alloc::{string::String, vec::Vec};

use zeroize::Zeroize;

use super::{BlockCipherMode, load_iv};
use crate::{BlockCipher, CryptoError, Direction, utils::check_block_buffers};

/// Cipher feedback with an `s`-bit segment, `8 <= s <= 8 * block_size` and `s % 8 == 0`.
///
/// Each step encrypts the register, XORs the leading `s / 8` keystream bytes into the segment and
/// shifts the resulting ciphertext segment into the register from the right. The underlying
/// transform only ever runs forwards, so decryption keys it for encryption too.
#[derive(Debug)]
pub struct CfbBlockCipher<B: BlockCipher> {
    cipher: B,
    segment: usize,
    iv: Vec<u8>,
    register: Vec<u8>,
    keystream: Vec<u8>,
    direction: Option<Direction>,
}

impl<B: BlockCipher> CfbBlockCipher<B> {
    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] if `bits` is not a whole number of bytes between
    /// 8 and the cipher block size.
    pub fn new(cipher: B, bits: usize) -> Result<Self, CryptoError> {
        let block_size = cipher.block_size();
        if bits < 8 || bits % 8 != 0 || bits > block_size * 8 {
            return Err(CryptoError::IllegalArgument("CFB segment size not supported"));
        }
        Ok(Self::with_segment(cipher, bits / 8))
    }

    /// CFB with the segment equal to the whole cipher block.
    pub fn full_block(cipher: B) -> Self {
        let block_size = cipher.block_size();
        Self::with_segment(cipher, block_size)
    }

    /// `segment` is in bytes and must already be within `1..=block_size`.
    pub(crate) fn with_segment(cipher: B, segment: usize) -> Self {
        let block_size = cipher.block_size();
        debug_assert!(segment >= 1 && segment <= block_size);
        Self {
            cipher,
            segment,
            iv: vec![0; block_size],
            register: vec![0; block_size],
            keystream: vec![0; block_size],
            direction: None,
        }
    }

    pub fn segment_bits(&self) -> usize {
        self.segment * 8
    }

    /// Encrypts the current register into `out`, used by the CFB MAC to close a computation.
    pub(crate) fn mac_block(&self, out: &mut [u8]) -> Result<usize, CryptoError> {
        if self.direction.is_none() {
            return Err(CryptoError::IllegalState("CFB mode not initialised"));
        }
        self.cipher.process_block(&self.register, out)
    }

    fn shift_in(&mut self, ciphertext: &[u8]) {
        self.register.copy_within(self.segment.., 0);
        let tail = self.register.len() - self.segment;
        self.register[tail..].copy_from_slice(&ciphertext[..self.segment]);
    }
}

impl<B: BlockCipher> BlockCipherMode for CfbBlockCipher<B> {
    fn init(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        load_iv(&mut self.iv, iv)?;
        self.cipher.init(Direction::Encrypt, key)?;
        self.direction = Some(direction);
        self.reset();
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.segment
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let direction =
            self.direction.ok_or(CryptoError::IllegalState("CFB mode not initialised"))?;
        let segment = self.segment;
        check_block_buffers(input, output, segment)?;

        self.cipher.process_block(&self.register, &mut self.keystream)?;
        let keystream = input[..segment].iter().zip(&self.keystream);
        for (o, (i, k)) in output[..segment].iter_mut().zip(keystream) {
            *o = i ^ k;
        }

        match direction {
            Direction::Encrypt => self.shift_in(&output[..segment]),
            Direction::Decrypt => self.shift_in(&input[..segment]),
        }
        Ok(segment)
    }

    fn reset(&mut self) {
        self.register.copy_from_slice(&self.iv);
        self.keystream.fill(0);
    }

    fn clear(&mut self) {
        self.cipher.clear();
        self.direction = None;
        self.iv.as_mut_slice().zeroize();
        self.register.as_mut_slice().zeroize();
        self.keystream.as_mut_slice().zeroize();
    }

    fn underlying_algorithm(&self) -> &'static str {
        self.cipher.algorithm_name()
    }

    fn algorithm_name(&self) -> String {
        format!("{}/CFB{}", self.cipher.algorithm_name(), self.segment * 8)
    }
}
