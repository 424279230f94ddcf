use alloc::vec::Vec;
use core::{fmt, marker::PhantomData};

use digest::Digest;
use k256::elliptic_curve::{
    CurveArithmetic, Field, FieldBytesSize, PublicKey as CurvePublicKey,
    SecretKey as CurveSecretKey,
    bigint::U256,
    group::Curve as _,
    ops::Reduce,
    sec1::{ModulusSize, ToEncodedPoint},
};
use zeroize::{Zeroize, Zeroizing};

use super::{BasicAgreement, PublicKey, SecretKey, SharedSecret};
use crate::CryptoError;

const MAX_UKM_LEN: usize = 32;

/// Coordinates of `(ukm · d) · Q`, each little-endian, concatenated `x || y`.
fn scaled_point<C>(
    d: &CurveSecretKey<C>,
    q: &CurvePublicKey<C>,
    ukm: &[u8; MAX_UKM_LEN],
) -> Result<Zeroizing<Vec<u8>>, CryptoError>
where
    C: CurveArithmetic,
    C::Scalar: Reduce<U256>,
    C::AffinePoint: ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let ukm = <C::Scalar as Reduce<U256>>::reduce(U256::from_be_slice(ukm));
    let h = ukm * *d.to_nonzero_scalar();
    if bool::from(h.is_zero()) {
        return Err(CryptoError::IllegalArgument("UKM is a multiple of the group order"));
    }

    let point = (C::ProjectivePoint::from(*q.as_affine()) * h).to_affine();
    let encoded = point.to_encoded_point(false);
    let (Some(x), Some(y)) = (encoded.x(), encoded.y()) else {
        return Err(CryptoError::InvalidKey("agreement produced the point at infinity"));
    };

    let mut out = Zeroizing::new(Vec::with_capacity(x.len() + y.len()));
    out.extend(x.iter().rev());
    out.extend(y.iter().rev());
    Ok(out)
}

/// VKO key agreement (RFC 7836 / GOST R 34.10 style) generalised to the supported curves.
///
/// The UKM is read little-endian, at most 32 bytes, defaulting to 1. The private scalar is
/// multiplied by it modulo the group order and the product applied to the peer point. The shared
/// value is `D(x_le || y_le)`.
pub struct EcVkoAgreement<D: Digest> {
    key: Option<SecretKey>,
    ukm: [u8; MAX_UKM_LEN],
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest> EcVkoAgreement<D> {
    pub fn new() -> Self {
        Self { key: None, ukm: [0; MAX_UKM_LEN], _digest: PhantomData }
    }
}

impl<D: Digest> Default for EcVkoAgreement<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> fmt::Debug for EcVkoAgreement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcVkoAgreement").field("key", &self.key).finish_non_exhaustive()
    }
}

impl<D: Digest> BasicAgreement for EcVkoAgreement<D> {
    fn init(&mut self, private_key: &SecretKey, ukm: Option<&[u8]>) -> Result<(), CryptoError> {
        let ukm = ukm.unwrap_or(&[1]);
        if ukm.len() > MAX_UKM_LEN {
            return Err(CryptoError::IllegalArgument("UKM longer than 32 bytes"));
        }
        // stored big-endian for the scalar reduction
        self.ukm.zeroize();
        for (dst, src) in self.ukm.iter_mut().rev().zip(ukm) {
            *dst = *src;
        }
        self.key = Some(private_key.clone());
        Ok(())
    }

    fn calculate_agreement(&self, peer: &PublicKey) -> Result<SharedSecret, CryptoError> {
        let key = self.key.as_ref().ok_or(CryptoError::IllegalState("VKO not initialised"))?;
        let coordinates = match (key, peer) {
            (SecretKey::Secp256k1(d), PublicKey::Secp256k1(q)) => scaled_point(d, q, &self.ukm)?,
            (SecretKey::P256(d), PublicKey::P256(q)) => scaled_point(d, q, &self.ukm)?,
            _ => return Err(CryptoError::InvalidKey("peer key is on a different curve")),
        };

        let mut digest = D::digest(coordinates.as_slice());
        let shared = Zeroizing::new(digest.to_vec());
        digest.as_mut_slice().zeroize();
        Ok(SharedSecret::new(shared))
    }

    fn clear(&mut self) {
        self.key = None;
        self.ukm.zeroize();
    }
}

impl<D: Digest> Drop for EcVkoAgreement<D> {
    fn drop(&mut self) {
        self.ukm.zeroize();
    }
}
