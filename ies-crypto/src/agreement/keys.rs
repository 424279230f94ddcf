use alloc::vec::Vec;
use core::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::CryptoError;

const COMPRESSED_EVEN: u8 = 0x02;
const COMPRESSED_ODD: u8 = 0x03;
const UNCOMPRESSED: u8 = 0x04;

// CURVE
// ================================================================================================

/// Supported prime-order curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve {
    Secp256k1,
    P256,
}

impl Curve {
    pub fn name(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::P256 => "P-256",
        }
    }

    /// Size in bytes of a field element, and of the ECDH shared value.
    pub fn field_size(self) -> usize {
        match self {
            Curve::Secp256k1 | Curve::P256 => 32,
        }
    }

    pub fn compressed_point_len(self) -> usize {
        1 + self.field_size()
    }

    pub fn uncompressed_point_len(self) -> usize {
        1 + 2 * self.field_size()
    }

    /// Length of a SEC1 point encoding that starts with `tag`, or `None` for tags that do not
    /// introduce a finite point.
    pub fn encoded_point_len(self, tag: u8) -> Option<usize> {
        match tag {
            COMPRESSED_EVEN | COMPRESSED_ODD => Some(self.compressed_point_len()),
            UNCOMPRESSED => Some(self.uncompressed_point_len()),
            _ => None,
        }
    }
}

// SECRET KEY
// ================================================================================================

/// A private scalar on one of the supported curves. Zeroized on drop by the curve crates.
#[derive(Clone)]
pub enum SecretKey {
    Secp256k1(k256::SecretKey),
    P256(p256::SecretKey),
}

impl SecretKey {
    /// Generates a random key using the provided random number generator.
    pub fn random<R: CryptoRng + RngCore>(curve: Curve, rng: &mut R) -> Self {
        match curve {
            Curve::Secp256k1 => SecretKey::Secp256k1(k256::SecretKey::random(rng)),
            Curve::P256 => SecretKey::P256(p256::SecretKey::random(rng)),
        }
    }

    /// Parses a big-endian scalar.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidKey`] if the bytes are not a scalar in `[1, n)`.
    pub fn from_be_bytes(curve: Curve, bytes: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKey("secret scalar out of range");
        match curve {
            Curve::Secp256k1 => k256::SecretKey::from_slice(bytes).map(SecretKey::Secp256k1),
            Curve::P256 => p256::SecretKey::from_slice(bytes).map(SecretKey::P256),
        }
        .map_err(invalid)
    }

    pub fn to_be_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(match self {
            SecretKey::Secp256k1(key) => key.to_bytes().to_vec(),
            SecretKey::P256(key) => key.to_bytes().to_vec(),
        })
    }

    pub fn curve(&self) -> Curve {
        match self {
            SecretKey::Secp256k1(_) => Curve::Secp256k1,
            SecretKey::P256(_) => Curve::P256,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            SecretKey::Secp256k1(key) => PublicKey::Secp256k1(key.public_key()),
            SecretKey::P256(key) => PublicKey::P256(key.public_key()),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").field("curve", &self.curve()).finish_non_exhaustive()
    }
}

// PUBLIC KEY
// ================================================================================================

/// A non-identity point on one of the supported curves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Secp256k1(k256::PublicKey),
    P256(p256::PublicKey),
}

impl PublicKey {
    /// Decodes a compressed or uncompressed SEC1 point.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidKey`] if the encoding is malformed or the point is not on the
    /// curve.
    pub fn from_sec1_bytes(curve: Curve, bytes: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKey("malformed public point");
        match curve {
            Curve::Secp256k1 => k256::PublicKey::from_sec1_bytes(bytes).map(PublicKey::Secp256k1),
            Curve::P256 => p256::PublicKey::from_sec1_bytes(bytes).map(PublicKey::P256),
        }
        .map_err(invalid)
    }

    /// SEC1 encoding of the point.
    pub fn to_sec1_bytes(&self, compressed: bool) -> Vec<u8> {
        match self {
            PublicKey::Secp256k1(key) => key.to_encoded_point(compressed).as_bytes().to_vec(),
            PublicKey::P256(key) => key.to_encoded_point(compressed).as_bytes().to_vec(),
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            PublicKey::Secp256k1(_) => Curve::Secp256k1,
            PublicKey::P256(_) => Curve::P256,
        }
    }
}

/// Reads an encoded point from the front of `input` and returns it with the number of bytes it
/// occupied. The length is determined by the leading tag byte.
///
/// # Errors
/// Returns [`CryptoError::InvalidKey`] for an unknown tag or an invalid point and
/// [`CryptoError::DataLength`] if `input` ends before the encoding does.
pub fn read_public_key(curve: Curve, input: &[u8]) -> Result<(PublicKey, usize), CryptoError> {
    let tag = *input.first().ok_or(CryptoError::DataLength("missing public point"))?;
    let len = curve
        .encoded_point_len(tag)
        .ok_or(CryptoError::InvalidKey("unknown point encoding tag"))?;
    let encoded = input.get(..len).ok_or(CryptoError::DataLength("truncated public point"))?;
    Ok((PublicKey::from_sec1_bytes(curve, encoded)?, len))
}

// EPHEMERAL KEYS
// ================================================================================================

/// A freshly generated key pair together with the encoding of its public half.
#[derive(Debug, Clone)]
pub struct EphemeralKeyPair {
    secret: SecretKey,
    public: PublicKey,
    encoded: Vec<u8>,
}

impl EphemeralKeyPair {
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The public value as it is written into a ciphertext.
    pub fn encoded_public_key(&self) -> &[u8] {
        &self.encoded
    }
}

/// Produces ephemeral key pairs on a fixed curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralKeyPairGenerator {
    curve: Curve,
    compressed: bool,
}

impl EphemeralKeyPairGenerator {
    pub fn new(curve: Curve, compressed: bool) -> Self {
        Self { curve, compressed }
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn generate<R: CryptoRng + RngCore>(&self, rng: &mut R) -> EphemeralKeyPair {
        let secret = SecretKey::random(self.curve, rng);
        Self::from_secret(secret, self.compressed)
    }

    /// Wraps an existing secret as an ephemeral pair.
    pub fn from_secret(secret: SecretKey, compressed: bool) -> EphemeralKeyPair {
        let public = secret.public_key();
        let encoded = public.to_sec1_bytes(compressed);
        EphemeralKeyPair { secret, public, encoded }
    }
}
