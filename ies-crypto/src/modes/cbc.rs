use alloc::{string::String, vec::Vec};

use zeroize::Zeroize;

use super::{BlockCipherMode, load_iv};
use crate::{
    BlockCipher, CryptoError, Direction,
    utils::{check_block_buffers, xor_in_place},
};

/// Cipher block chaining.
///
/// Encryption computes `E(input ⊕ register)` and feeds the ciphertext back; decryption computes
/// `D(input) ⊕ register` and feeds the received ciphertext back.
#[derive(Debug)]
pub struct CbcBlockCipher<B: BlockCipher> {
    cipher: B,
    iv: Vec<u8>,
    register: Vec<u8>,
    direction: Option<Direction>,
}

impl<B: BlockCipher> CbcBlockCipher<B> {
    pub fn new(cipher: B) -> Self {
        let block_size = cipher.block_size();
        Self {
            cipher,
            iv: vec![0; block_size],
            register: vec![0; block_size],
            direction: None,
        }
    }

    /// Current contents of the feedback register.
    pub fn register(&self) -> &[u8] {
        &self.register
    }

    fn encrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let block_size = self.register.len();
        xor_in_place(&mut self.register, &input[..block_size]);
        let written = self.cipher.process_block(&self.register, output)?;
        self.register.copy_from_slice(&output[..block_size]);
        Ok(written)
    }

    fn decrypt_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let block_size = self.register.len();
        let written = self.cipher.process_block(input, output)?;
        xor_in_place(&mut output[..block_size], &self.register);
        self.register.copy_from_slice(&input[..block_size]);
        Ok(written)
    }
}

impl<B: BlockCipher> BlockCipherMode for CbcBlockCipher<B> {
    fn init(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        load_iv(&mut self.iv, iv)?;
        self.cipher.init(direction, key)?;
        self.direction = Some(direction);
        self.reset();
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let direction =
            self.direction.ok_or(CryptoError::IllegalState("CBC mode not initialised"))?;
        check_block_buffers(input, output, self.register.len())?;
        match direction {
            Direction::Encrypt => self.encrypt_block(input, output),
            Direction::Decrypt => self.decrypt_block(input, output),
        }
    }

    fn reset(&mut self) {
        self.register.copy_from_slice(&self.iv);
    }

    fn clear(&mut self) {
        self.cipher.clear();
        self.direction = None;
        self.iv.as_mut_slice().zeroize();
        self.register.as_mut_slice().zeroize();
    }

    fn underlying_algorithm(&self) -> &'static str {
        self.cipher.algorithm_name()
    }

    fn algorithm_name(&self) -> String {
        format!("{}/CBC", self.cipher.algorithm_name())
    }
}
