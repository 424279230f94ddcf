use alloc::vec::Vec;

use k256::elliptic_curve::{
    CurveArithmetic, PublicKey as CurvePublicKey, SecretKey as CurveSecretKey, ecdh,
};
use zeroize::Zeroizing;

use super::{BasicAgreement, PublicKey, SecretKey, SharedSecret};
use crate::{CryptoError, kdf::DerivationFunction};

/// x-coordinate of `d · Q`, left padded to the field size.
fn shared_x<C: CurveArithmetic>(
    d: &CurveSecretKey<C>,
    q: &CurvePublicKey<C>,
) -> Zeroizing<Vec<u8>> {
    let shared = ecdh::diffie_hellman(d.to_nonzero_scalar(), q.as_affine());
    Zeroizing::new(shared.raw_secret_bytes().to_vec())
}

pub(super) fn raw_agreement(
    secret: &SecretKey,
    peer: &PublicKey,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    match (secret, peer) {
        (SecretKey::Secp256k1(d), PublicKey::Secp256k1(q)) => Ok(shared_x(d, q)),
        (SecretKey::P256(d), PublicKey::P256(q)) => Ok(shared_x(d, q)),
        _ => Err(CryptoError::InvalidKey("peer key is on a different curve")),
    }
}

// PLAIN ECDH
// ================================================================================================

/// Elliptic curve Diffie-Hellman (SEC 1, section 3.3.1): the shared value is the x-coordinate of
/// `d · Q`. User keying material is not accepted.
#[derive(Debug, Default, Clone)]
pub struct EcdhBasicAgreement {
    key: Option<SecretKey>,
}

impl EcdhBasicAgreement {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BasicAgreement for EcdhBasicAgreement {
    fn init(&mut self, private_key: &SecretKey, ukm: Option<&[u8]>) -> Result<(), CryptoError> {
        if ukm.is_some() {
            return Err(CryptoError::IllegalArgument("ECDH does not take user keying material"));
        }
        self.key = Some(private_key.clone());
        Ok(())
    }

    fn calculate_agreement(&self, peer: &PublicKey) -> Result<SharedSecret, CryptoError> {
        let key = self.key.as_ref().ok_or(CryptoError::IllegalState("ECDH not initialised"))?;
        raw_agreement(key, peer).map(SharedSecret::new)
    }

    fn clear(&mut self) {
        self.key = None;
    }
}

// ECDH WITH KDF
// ================================================================================================

/// ECDH followed by a derivation function: the result is `K(Z, ukm, key_len)`, with the UKM as
/// the KDF other-info.
#[derive(Debug, Clone)]
pub struct EcdhKdfAgreement<K: DerivationFunction> {
    kdf: K,
    key_len: usize,
    key: Option<SecretKey>,
    ukm: Zeroizing<Vec<u8>>,
}

impl<K: DerivationFunction> EcdhKdfAgreement<K> {
    pub fn new(kdf: K, key_len: usize) -> Self {
        Self { kdf, key_len, key: None, ukm: Zeroizing::new(Vec::new()) }
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }
}

impl<K: DerivationFunction> BasicAgreement for EcdhKdfAgreement<K> {
    fn init(&mut self, private_key: &SecretKey, ukm: Option<&[u8]>) -> Result<(), CryptoError> {
        self.key = Some(private_key.clone());
        self.ukm = Zeroizing::new(ukm.map(<[u8]>::to_vec).unwrap_or_default());
        Ok(())
    }

    fn calculate_agreement(&self, peer: &PublicKey) -> Result<SharedSecret, CryptoError> {
        let key = self.key.as_ref().ok_or(CryptoError::IllegalState("ECDH not initialised"))?;
        let z = raw_agreement(key, peer)?;
        self.kdf.derive(&z, &self.ukm, self.key_len).map(SharedSecret::new)
    }

    fn clear(&mut self) {
        self.key = None;
        self.ukm = Zeroizing::new(Vec::new());
    }
}
