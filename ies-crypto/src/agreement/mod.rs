//! Elliptic curve key agreement.
//!
//! An agreement is initialised with the local private key (and optional user keying material)
//! and then combines it with a peer public key into a [`SharedSecret`]. Both keys must be on the
//! same [`Curve`].
//!
//! The curve arithmetic comes from the RustCrypto `k256` and `p256` crates; this module only
//! selects the curve at runtime and shapes the output of each agreement.

use alloc::vec::Vec;
use core::fmt;

use zeroize::Zeroizing;

use crate::CryptoError;

mod ecdh;
mod keys;
mod vko;


pub use ecdh::{EcdhBasicAgreement, EcdhKdfAgreement};
pub use keys::{
    Curve, EphemeralKeyPair, EphemeralKeyPairGenerator, PublicKey, SecretKey, read_public_key,
};
pub use vko::EcVkoAgreement;

// AGREEMENT TRAIT
// ================================================================================================

/// A key agreement between a local private key and a peer public key.
pub trait BasicAgreement {
    /// Fixes the local private key and the user keying material for later agreements.
    ///
    /// # Errors
    /// Returns [`CryptoError::IllegalArgument`] if the agreement does not accept the given UKM.
    fn init(&mut self, private_key: &SecretKey, ukm: Option<&[u8]>) -> Result<(), CryptoError>;

    /// Computes the shared value with `peer`.
    ///
    /// # Errors
    /// Returns [`CryptoError::IllegalState`] before `init` and [`CryptoError::InvalidKey`] if the
    /// peer key is on a different curve from the local key.
    fn calculate_agreement(&self, peer: &PublicKey) -> Result<SharedSecret, CryptoError>;

    /// Drops the private key and UKM set by [`BasicAgreement::init`].
    fn clear(&mut self);
}

// SHARED SECRET
// ================================================================================================

/// The output of a key agreement, wiped on drop.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: Zeroizing<Vec<u8>>,
}

impl SharedSecret {
    pub(crate) fn new(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}
