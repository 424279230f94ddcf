use core::fmt;

use ::aes::{
    Aes128, Aes192, Aes256, Block,
    cipher::{BlockDecrypt, BlockEncrypt, KeyInit},
};

use super::{BlockCipher, Direction};
use crate::{CryptoError, utils::check_block_buffers};

const BLOCK_SIZE: usize = 16;

enum Schedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// AES with 128, 192 or 256-bit keys, selected by key length at [`BlockCipher::init`].
#[derive(Default)]
pub struct AesEngine {
    schedule: Option<(Schedule, Direction)>,
}

impl AesEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for AesEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesEngine")
            .field("direction", &self.schedule.as_ref().map(|(_, d)| *d))
            .finish_non_exhaustive()
    }
}

impl BlockCipher for AesEngine {
    fn init(&mut self, direction: Direction, key: &[u8]) -> Result<(), CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength { algorithm: "AES", length: key.len() };
        let schedule = match key.len() {
            16 => Schedule::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            24 => Schedule::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            32 => Schedule::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
            length => return Err(CryptoError::InvalidKeyLength { algorithm: "AES", length }),
        };
        self.schedule = Some((schedule, direction));
        Ok(())
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn process_block(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let (schedule, direction) = self
            .schedule
            .as_ref()
            .ok_or(CryptoError::IllegalState("AES engine not initialised"))?;
        check_block_buffers(input, output, BLOCK_SIZE)?;

        let mut block = Block::clone_from_slice(&input[..BLOCK_SIZE]);
        match (schedule, direction) {
            (Schedule::Aes128(c), Direction::Encrypt) => c.encrypt_block(&mut block),
            (Schedule::Aes128(c), Direction::Decrypt) => c.decrypt_block(&mut block),
            (Schedule::Aes192(c), Direction::Encrypt) => c.encrypt_block(&mut block),
            (Schedule::Aes192(c), Direction::Decrypt) => c.decrypt_block(&mut block),
            (Schedule::Aes256(c), Direction::Encrypt) => c.encrypt_block(&mut block),
            (Schedule::Aes256(c), Direction::Decrypt) => c.decrypt_block(&mut block),
        }
        output[..BLOCK_SIZE].copy_from_slice(&block);

        Ok(BLOCK_SIZE)
    }

    fn clear(&mut self) {
        self.schedule = None;
    }

    fn algorithm_name(&self) -> &'static str {
        "AES"
    }
}
