use thiserror::Error;

use crate::CryptoError;

/// Error type for the Integrated Encryption Scheme (IES) engine.
///
/// Failures while decrypting are always reported as [`IesError::InvalidCipherText`], whatever
/// check rejected the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IesError {
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
    #[error("invalid ciphertext")]
    InvalidCipherText,
    #[error("primitive failure: {0}")]
    Primitive(#[from] CryptoError),
}
