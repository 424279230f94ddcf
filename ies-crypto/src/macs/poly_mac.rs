use alloc::string::String;
use core::fmt;

use zeroize::Zeroize;

use super::{BlockBuffer, Mac, MacPadding, check_mac_output, mac_size_from_bits};
use crate::{
    BlockCipher, CryptoError, Direction,
    kgcm::{KgcmMultiplier, Tables8kKgcmMultiplier128, util},
};

const BLOCK_SIZE: usize = 16;
const MIN_MAC_SIZE: usize = 4;

/// Polynomial MAC over GF(2^128) keyed by a 128-bit block transform.
///
/// `H = E_K(0)` read little-endian, every 16-byte block is folded as `S = (S ⊕ block) · H` with
/// the final partial block zero filled, then the bit length is folded in the same way. The tag is
/// the leading `mac_size` bytes of `E_K(S ⊕ E_K(N))`, where `N` is the nonce given at init (zero
/// otherwise).
///
/// This is a crate-local construction. It does not interoperate with GMAC or with the DSTU 7624
/// KGMAC, and its tags only verify against this implementation.
pub struct PolyMac128<B: BlockCipher, M: KgcmMultiplier + Default = Tables8kKgcmMultiplier128> {
    cipher: B,
    multiplier: M,
    buffer: BlockBuffer,
    state: [u64; 2],
    nonce: [u8; BLOCK_SIZE],
    processed: u64,
    mac_size: usize,
    keyed: bool,
}

impl<B: BlockCipher, M: KgcmMultiplier + Default> PolyMac128<B, M> {
    /// A full 128-bit tag.
    ///
    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] if the transform block is not 128 bits.
    pub fn new(cipher: B) -> Result<Self, CryptoError> {
        Self::with_config(cipher, BLOCK_SIZE * 8)
    }

    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] if the transform block is not 128 bits or the tag
    /// size is not a whole number of bytes between 32 and 128 bits.
    pub fn with_config(cipher: B, mac_size_bits: usize) -> Result<Self, CryptoError> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(CryptoError::IllegalArgument("PolyMac128 requires a 128-bit block cipher"));
        }
        let mac_size = mac_size_from_bits(mac_size_bits, BLOCK_SIZE)?;
        if mac_size < MIN_MAC_SIZE {
            return Err(CryptoError::IllegalArgument("PolyMac128 tag must be at least 32 bits"));
        }
        Ok(Self {
            cipher,
            multiplier: M::default(),
            buffer: BlockBuffer::new(BLOCK_SIZE),
            state: util::zero(),
            nonce: [0; BLOCK_SIZE],
            processed: 0,
            mac_size,
            keyed: false,
        })
    }

    /// Keys the MAC and sets the nonce encrypted into the final tag.
    pub fn init_with_nonce(&mut self, key: &[u8], nonce: &[u8]) -> Result<(), CryptoError> {
        if nonce.len() != BLOCK_SIZE {
            return Err(CryptoError::IllegalArgument("PolyMac128 nonce must be 16 bytes"));
        }
        self.keyed = false;
        self.cipher.init(Direction::Encrypt, key)?;

        let mut h = [0u8; BLOCK_SIZE];
        self.cipher.process_block(&[0u8; BLOCK_SIZE], &mut h)?;
        self.multiplier.init(&util::from_le_bytes(&h));
        h.zeroize();

        self.nonce.copy_from_slice(nonce);
        self.keyed = true;
        self.reset();
        Ok(())
    }

    fn ensure_keyed(&self) -> Result<(), CryptoError> {
        if !self.keyed {
            return Err(CryptoError::IllegalState("PolyMac128 not initialised"));
        }
        Ok(())
    }

    fn encrypt(&self, block: &[u8; BLOCK_SIZE]) -> Result<[u8; BLOCK_SIZE], CryptoError> {
        let mut out = [0u8; BLOCK_SIZE];
        self.cipher.process_block(block, &mut out)?;
        Ok(out)
    }
}

/// `S = (S ⊕ block) · H`.
fn fold<M: KgcmMultiplier>(multiplier: &M, state: &mut [u64; 2], block: &[u8]) {
    let mut bytes = [0u8; BLOCK_SIZE];
    bytes[..block.len()].copy_from_slice(block);
    *state = util::add(state, &util::from_le_bytes(&bytes));
    multiplier.multiply_h(state);
}

impl<B: BlockCipher, M: KgcmMultiplier + Default> fmt::Debug for PolyMac128<B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyMac128")
            .field("cipher", &self.cipher)
            .field("mac_size", &self.mac_size)
            .field("keyed", &self.keyed)
            .finish_non_exhaustive()
    }
}

impl<B: BlockCipher, M: KgcmMultiplier + Default> Mac for PolyMac128<B, M> {
    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        self.init_with_nonce(key, &[0u8; BLOCK_SIZE])
    }

    fn mac_size(&self) -> usize {
        self.mac_size
    }

    fn update(&mut self, input: &[u8]) -> Result<(), CryptoError> {
        self.ensure_keyed()?;
        let (multiplier, state) = (&self.multiplier, &mut self.state);
        self.buffer.update(input, |block| {
            fold(multiplier, state, block);
            Ok(())
        })?;
        self.processed = self.processed.wrapping_add(input.len() as u64);
        Ok(())
    }

    fn do_final(&mut self, out: &mut [u8]) -> Result<usize, CryptoError> {
        check_mac_output(out, self.mac_size)?;
        self.ensure_keyed()?;

        if !self.buffer.is_empty() {
            let (multiplier, state) = (&self.multiplier, &mut self.state);
            self.buffer.finish(&MacPadding::ZeroFill, |block| {
                fold(multiplier, state, block);
                Ok(())
            })?;
        }
        let bit_length = [self.processed.wrapping_mul(8), 0];
        self.state = util::add(&self.state, &bit_length);
        self.multiplier.multiply_h(&mut self.state);

        let mut masked = util::to_le_bytes(&self.state);
        for (s, m) in masked.iter_mut().zip(self.encrypt(&self.nonce)?) {
            *s ^= m;
        }
        let mut tag = self.encrypt(&masked)?;
        masked.zeroize();
        out[..self.mac_size].copy_from_slice(&tag[..self.mac_size]);
        tag.zeroize();

        self.reset();
        Ok(self.mac_size)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.state.zeroize();
        self.processed = 0;
    }

    fn clear(&mut self) {
        self.reset();
        self.keyed = false;
        self.cipher.clear();
        self.multiplier = M::default();
        self.nonce.zeroize();
    }

    fn algorithm_name(&self) -> String {
        format!("{}/PolyMac128", self.cipher.algorithm_name())
    }
}

impl<B: BlockCipher, M: KgcmMultiplier + Default> Drop for PolyMac128<B, M> {
    fn drop(&mut self) {
        self.state.zeroize();
        self.nonce.zeroize();
    }
}
