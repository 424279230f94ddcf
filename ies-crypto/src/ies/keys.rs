use rand_core::{CryptoRng, RngCore};

use super::{IesError, IesParameters};
use crate::{
    Direction,
    agreement::{EphemeralKeyPair, EphemeralKeyPairGenerator, PublicKey, SecretKey},
};

/// The key set an [`IesEngine`](super::IesEngine) is initialised with.
///
/// The variant fixes both the direction and whether an ephemeral public value travels in the
/// envelope.
#[derive(Debug, Clone)]
pub enum IesKeys {
    /// Encrypt to `recipient` under a fresh ephemeral pair whose public value is prepended to the
    /// envelope.
    Ephemeral { recipient: PublicKey, ephemeral: EphemeralKeyPair },
    /// Decrypt an envelope that starts with an ephemeral public value.
    Recipient { private: SecretKey },
    /// Static-static agreement in either direction. No ephemeral value is written or expected.
    Static { private: SecretKey, peer: PublicKey },
}

impl IesKeys {
    /// Generates an ephemeral pair on the recipient's curve, encoded as `params` requests.
    pub fn ephemeral<R: CryptoRng + RngCore>(
        recipient: PublicKey,
        params: &IesParameters,
        rng: &mut R,
    ) -> Self {
        let generator =
            EphemeralKeyPairGenerator::new(recipient.curve(), params.point_compression());
        let ephemeral = generator.generate(rng);
        IesKeys::Ephemeral { recipient, ephemeral }
    }

    pub(super) fn mode(&self) -> &'static str {
        match self {
            IesKeys::Ephemeral { .. } => "ephemeral",
            IesKeys::Recipient { .. } => "recipient",
            IesKeys::Static { .. } => "static",
        }
    }

    pub(super) fn has_ephemeral(&self) -> bool {
        !matches!(self, IesKeys::Static { .. })
    }

    /// Checks the variant against `direction` and that both halves share a curve.
    pub(super) fn validate(&self, direction: Direction) -> Result<(), IesError> {
        match (self, direction) {
            (IesKeys::Ephemeral { recipient, ephemeral }, Direction::Encrypt) => {
                if recipient.curve() != ephemeral.secret_key().curve() {
                    return Err(IesError::InvalidKey("ephemeral key is on a different curve"));
                }
            },
            (IesKeys::Static { private, peer }, _) => {
                if private.curve() != peer.curve() {
                    return Err(IesError::InvalidKey("peer key is on a different curve"));
                }
            },
            (IesKeys::Recipient { .. }, Direction::Decrypt) => {},
            (IesKeys::Ephemeral { .. }, Direction::Decrypt) => {
                return Err(IesError::InvalidKey("ephemeral keys can only encrypt"));
            },
            (IesKeys::Recipient { .. }, Direction::Encrypt) => {
                return Err(IesError::InvalidKey("recipient keys can only decrypt"));
            },
        }
        Ok(())
    }
}
