//! DES and two/three-key DES-EDE.
//!
//! Kept for the legacy MAC constructions (FIPS 113 data authentication) and the DESede IES
//! preset. Parity bits in keys are ignored.

use core::fmt;

use ::des::{
    Des, TdesEde2, TdesEde3,
    cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray},
};

use super::{BlockCipher, Direction};
use crate::{CryptoError, utils::check_block_buffers};

const BLOCK_SIZE: usize = 8;

// DES
// ================================================================================================

/// Single DES, 8-byte key.
#[derive(Default)]
pub struct DesEngine {
    schedule: Option<(Des, Direction)>,
}

impl DesEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for DesEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesEngine")
            .field("direction", &self.schedule.as_ref().map(|(_, d)| *d))
            .finish_non_exhaustive()
    }
}

impl BlockCipher for DesEngine {
    fn init(&mut self, direction: Direction, key: &[u8]) -> Result<(), CryptoError> {
        let cipher = Des::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength { algorithm: "DES", length: key.len() })?;
        self.schedule = Some((cipher, direction));
        Ok(())
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn process_block(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CryptoError> {
        let (cipher, direction) = self
            .schedule
            .as_ref()
            .ok_or(CryptoError::IllegalState("DES engine not initialised"))?;
        check_block_buffers(input, output, BLOCK_SIZE)?;

        let mut block = GenericArray::clone_from_slice(&input[..BLOCK_SIZE]);
        match direction {
            Direction::Encrypt => cipher.encrypt_block(&mut block),
            Direction::Decrypt => cipher.decrypt_block(&mut block),
        }
        output[..BLOCK_SIZE].copy_from_slice(&block);

        Ok(BLOCK_SIZE)
    }

    fn clear(&mut self) {
        self.schedule = None;
    }

    fn algorithm_name(&self) -> &'static str {
        "DES"
    }
}

// DES-EDE
// ================================================================================================

enum EdeSchedule {
    TwoKey(TdesEde2),
    ThreeKey(TdesEde3),
}

/// Triple DES in encrypt-decrypt-encrypt form: 16-byte keys select the two-key variant
/// (K1 ‖ K2, K3 = K1), 24-byte keys the three-key variant.
#[derive(Default)]
pub struct DesEdeEngine {
    schedule: Option<(EdeSchedule, Direction)>,
}

impl DesEdeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for DesEdeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesEdeEngine")
            .field("direction", &self.schedule.as_ref().map(|(_, d)| *d))
            .finish_non_exhaustive()
    }
}

impl BlockCipher for DesEdeEngine {
    fn init(&mut self, direction: Direction, key: &[u8]) -> Result<(), CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLength { algorithm: "DESede", length: key.len() };
        let schedule = match key.len() {
            16 => EdeSchedule::TwoKey(TdesEde2::new_from_slice(key).map_err(invalid)?),
            24 => EdeSchedule::ThreeKey(TdesEde3::new_from_slice(key).map_err(invalid)?),
            length => return Err(CryptoError::InvalidKeyLength { algorithm: "DESede", length }),
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
            .ok_or(CryptoError::IllegalState("DESede engine not initialised"))?;
        check_block_buffers(input, output, BLOCK_SIZE)?;

        let mut block = GenericArray::clone_from_slice(&input[..BLOCK_SIZE]);
        match (schedule, direction) {
            (EdeSchedule::TwoKey(c), Direction::Encrypt) => c.encrypt_block(&mut block),
            (EdeSchedule::TwoKey(c), Direction::Decrypt) => c.decrypt_block(&mut block),
            (EdeSchedule::ThreeKey(c), Direction::Encrypt) => c.encrypt_block(&mut block),
            (EdeSchedule::ThreeKey(c), Direction::Decrypt) => c.decrypt_block(&mut block),
        }
        output[..BLOCK_SIZE].copy_from_slice(&block);

        Ok(BLOCK_SIZE)
    }

    fn clear(&mut self) {
        self.schedule = None;
    }

    fn algorithm_name(&self) -> &'static str {
        "DESede"
    }
}
