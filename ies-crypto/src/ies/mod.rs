//! Integrated Encryption Scheme (IES).
//!
//! [`IesEngine`] composes a key agreement, a key derivation function, a MAC and an optional
//! padded block cipher into a one-shot hybrid encryption. The envelope layout is
//!
//! ```text
//! [ephemeral public value] || tag || body
//! ```
//!
//! Concrete schemes are built by handing already-constructed primitives to the engine; [`Ecies`]
//! collects the usual ECIES configurations.
//!
//! # Examples
//!
//! ```
//! use ies_crypto::{
//!     Direction,
//!     agreement::{Curve, SecretKey},
//!     ies::{Ecies, IesKeys},
//! };
//! use rand_core::OsRng;
//!
//! let recipient = SecretKey::random(Curve::P256, &mut OsRng);
//!
//! let mut engine = Ecies::with_aes_cbc();
//! let params = engine.default_parameters(Some(&[7u8; 16]));
//! let keys = IesKeys::ephemeral(recipient.public_key(), &params, &mut OsRng);
//! engine.init(Direction::Encrypt, keys, params.clone()).unwrap();
//! let envelope = engine.process_block(b"hello world").unwrap();
//!
//! engine.init(Direction::Decrypt, IesKeys::Recipient { private: recipient }, params).unwrap();
//! assert_eq!(engine.process_block(&envelope).unwrap(), b"hello world");
//! ```

use alloc::boxed::Box;

use sha2::Sha256;

use crate::{
    agreement::EcdhBasicAgreement,
    engines::{AesEngine, DesEdeEngine},
    kdf::KdfBytesGenerator,
    macs::HMac,
    modes::{CbcBlockCipher, PaddedBlockCipher},
};

mod engine;
mod error;
mod keys;
mod params;


pub use engine::IesEngine;
pub use error::IesError;
pub use keys::IesKeys;
pub use params::IesParameters;

// PRESETS
// ================================================================================================

/// ECDH, KDF2 over SHA-256 and HMAC-SHA256.
pub type EciesEngine = IesEngine<EcdhBasicAgreement, KdfBytesGenerator<Sha256>, HMac<Sha256>>;

/// Constructors for the standard ECIES configurations.
#[derive(Debug, Clone, Copy)]
pub struct Ecies;

impl Ecies {
    /// ECIES with a keystream body and no block cipher.
    pub fn ecies() -> EciesEngine {
        IesEngine::new(EcdhBasicAgreement::new(), KdfBytesGenerator::kdf2(), HMac::new())
    }

    /// ECIES with an AES-CBC body under PKCS#7 padding.
    pub fn with_aes_cbc() -> EciesEngine {
        let cipher = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(AesEngine::new())));
        IesEngine::with_cipher(
            EcdhBasicAgreement::new(),
            KdfBytesGenerator::kdf2(),
            HMac::new(),
            cipher,
        )
    }

    /// ECIES with a triple-DES CBC body under PKCS#7 padding.
    pub fn with_desede_cbc() -> EciesEngine {
        let cipher = PaddedBlockCipher::new(Box::new(CbcBlockCipher::new(DesEdeEngine::new())));
        IesEngine::with_cipher(
            EcdhBasicAgreement::new(),
            KdfBytesGenerator::kdf2(),
            HMac::new(),
            cipher,
        )
    }
}
