//! Key derivation from a shared secret.
//!
//! [`KdfBytesGenerator`] is the counter-mode construction of ISO 18033-2 (KDF1 and KDF2), which
//! with a counter starting at 1 is also the ANSI X9.63 KDF:
//!
//! ```text
//! T_i = Hash(Z || I2OSP(counter_i, 4) || other_info)
//! ```

use alloc::vec::Vec;
use core::{fmt, marker::PhantomData};

use digest::Digest;
use zeroize::{Zeroize, Zeroizing};

use crate::CryptoError;


// DERIVATION FUNCTION TRAIT
// ================================================================================================

/// Expands a shared secret and context into keying material.
pub trait DerivationFunction {
    /// Fills `out` with keying material derived from `shared` and `other_info`.
    ///
    /// # Errors
    /// Returns [`CryptoError::OutputLength`] if `out` is longer than
    /// [`DerivationFunction::max_output_len`].
    fn generate_bytes(
        &self,
        shared: &[u8],
        other_info: &[u8],
        out: &mut [u8],
    ) -> Result<(), CryptoError>;

    /// Longest output, in bytes, a single derivation can produce.
    fn max_output_len(&self) -> u64;

    /// Derives `len` bytes into a buffer that is wiped on drop.
    ///
    /// The length is checked before anything is allocated.
    fn derive(
        &self,
        shared: &[u8],
        other_info: &[u8],
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        check_output_len(len, self.max_output_len())?;
        let mut out = Zeroizing::new(vec![0u8; len]);
        self.generate_bytes(shared, other_info, &mut out)?;
        Ok(out)
    }
}

fn check_output_len(len: usize, max: u64) -> Result<(), CryptoError> {
    let requested = len as u64;
    if requested > max {
        return Err(CryptoError::OutputLength { requested, max });
    }
    Ok(())
}

// COUNTER-MODE GENERATOR
// ================================================================================================

/// KDF1 / KDF2 over the hash `D`.
pub struct KdfBytesGenerator<D: Digest> {
    counter_start: u32,
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest> KdfBytesGenerator<D> {
    /// ISO 18033-2 KDF1: the counter starts at 0.
    pub fn kdf1() -> Self {
        Self { counter_start: 0, _digest: PhantomData }
    }

    /// ISO 18033-2 KDF2 and ANSI X9.63: the counter starts at 1.
    pub fn kdf2() -> Self {
        Self { counter_start: 1, _digest: PhantomData }
    }
}

impl<D: Digest> Default for KdfBytesGenerator<D> {
    fn default() -> Self {
        Self::kdf2()
    }
}

impl<D: Digest> Clone for KdfBytesGenerator<D> {
    fn clone(&self) -> Self {
        Self { counter_start: self.counter_start, _digest: PhantomData }
    }
}

impl<D: Digest> fmt::Debug for KdfBytesGenerator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdfBytesGenerator")
            .field("counter_start", &self.counter_start)
            .field("digest_size", &<D as Digest>::output_size())
            .finish()
    }
}

impl<D: Digest> DerivationFunction for KdfBytesGenerator<D> {
    fn generate_bytes(
        &self,
        shared: &[u8],
        other_info: &[u8],
        out: &mut [u8],
    ) -> Result<(), CryptoError> {
        check_output_len(out.len(), self.max_output_len())?;
        tracing::trace!(
            len = out.len(),
            counter_start = self.counter_start,
            "deriving key material"
        );

        let mut counter = self.counter_start;
        for chunk in out.chunks_mut(<D as Digest>::output_size()) {
            let mut hasher = D::new();
            hasher.update(shared);
            hasher.update(counter.to_be_bytes());
            hasher.update(other_info);
            let mut block = hasher.finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
            block.as_mut_slice().zeroize();
            counter = counter.wrapping_add(1);
        }
        Ok(())
    }

    fn max_output_len(&self) -> u64 {
        <D as Digest>::output_size() as u64 * u64::from(u32::MAX)
    }
}
