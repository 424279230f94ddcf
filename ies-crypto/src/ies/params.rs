use alloc::vec::Vec;

/// Per-message configuration of an [`IesEngine`](super::IesEngine).
///
/// Key sizes are given in bits. The derivation value is the KDF other-info and the encoding
/// value is appended to the MAC input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IesParameters {
    derivation: Vec<u8>,
    encoding: Vec<u8>,
    mac_key_size: usize,
    cipher_key_size: Option<usize>,
    nonce: Option<Vec<u8>>,
    point_compression: bool,
}

impl IesParameters {
    pub fn new(mac_key_size: usize) -> Self {
        Self {
            derivation: Vec::new(),
            encoding: Vec::new(),
            mac_key_size,
            cipher_key_size: None,
            nonce: None,
            point_compression: false,
        }
    }

    /// Sets the key size, in bits, of the symmetric cipher. Required when the engine has one.
    pub fn with_cipher_key_size(mut self, bits: usize) -> Self {
        self.cipher_key_size = Some(bits);
        self
    }

    pub fn with_derivation(mut self, derivation: &[u8]) -> Self {
        self.derivation = derivation.to_vec();
        self
    }

    pub fn with_encoding(mut self, encoding: &[u8]) -> Self {
        self.encoding = encoding.to_vec();
        self
    }

    /// Sets the IV of the symmetric cipher. It must be one cipher block long.
    pub fn with_nonce(mut self, nonce: &[u8]) -> Self {
        self.nonce = Some(nonce.to_vec());
        self
    }

    /// Selects the compressed SEC1 form for ephemeral public values.
    pub fn with_point_compression(mut self, compressed: bool) -> Self {
        self.point_compression = compressed;
        self
    }

    pub fn derivation(&self) -> &[u8] {
        &self.derivation
    }

    pub fn encoding(&self) -> &[u8] {
        &self.encoding
    }

    pub fn mac_key_size(&self) -> usize {
        self.mac_key_size
    }

    pub fn cipher_key_size(&self) -> Option<usize> {
        self.cipher_key_size
    }

    pub fn nonce(&self) -> Option<&[u8]> {
        self.nonce.as_deref()
    }

    pub fn point_compression(&self) -> bool {
        self.point_compression
    }
}
