use thiserror::Error;

/// Errors raised by the block, mode, MAC, field, agreement and derivation primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material is malformed or does not belong to the expected domain.
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),
    /// A symmetric key has a length the algorithm does not support.
    #[error("invalid key length {length} for {algorithm}")]
    InvalidKeyLength { algorithm: &'static str, length: usize },
    /// A buffer is too short, or input is not block aligned where alignment is required.
    #[error("data length error: {0}")]
    DataLength(&'static str),
    /// An operation was invoked outside the init -> process -> final sequence.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
    /// A construction or initialisation parameter is out of range.
    #[error("illegal argument: {0}")]
    IllegalArgument(&'static str),
    /// Ciphertext failed verification or is malformed.
    #[error("invalid ciphertext")]
    InvalidCipherText,
    /// A key derivation function was asked for more output than it can produce.
    #[error("requested output length {requested} exceeds the maximum of {max} bytes")]
    OutputLength { requested: u64, max: u64 },
}
