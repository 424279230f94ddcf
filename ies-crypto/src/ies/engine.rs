use alloc::vec::Vec;
use core::{mem, ops::Range};

use tracing::debug;
use zeroize::Zeroizing;

use super::{IesError, IesKeys, IesParameters};
use crate::{
    CryptoError, Direction, Mac,
    agreement::{BasicAgreement, PublicKey, SecretKey, read_public_key},
    kdf::DerivationFunction,
    modes::PaddedBlockCipher,
    utils::{constant_time_eq, xor_in_place},
};

#[derive(Debug)]
struct Session {
    direction: Direction,
    keys: IesKeys,
    params: IesParameters,
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Ready(Session),
    Finalized,
}

/// Positions of the cipher (or keystream) key and the MAC key within the derived key.
struct KeyLayout {
    cipher: Range<usize>,
    mac: Range<usize>,
}

impl KeyLayout {
    fn len(&self) -> usize {
        self.cipher.end.max(self.mac.end)
    }
}

// IES ENGINE
// ================================================================================================

/// Integrated Encryption Scheme over a key agreement `A`, a derivation function `K` and a MAC
/// `M`, with an optional padded block cipher for the body.
///
/// The envelope is `V || tag || body`, where `V` is the encoded ephemeral public value (absent
/// for static keys). When `V` is present it is prepended to the shared secret before derivation
/// and the MAC input ends with the 64-bit big-endian bit length of the encoding parameter.
///
/// Without a cipher the body is the input XORed with a KDF keystream as long as the input.
///
/// Each [`IesEngine::init`] allows exactly one [`IesEngine::process_block`]. Once it has run,
/// successfully or not, the session keys are dropped and the agreement, MAC and cipher are
/// cleared.
#[derive(Debug)]
pub struct IesEngine<A, K, M> {
    agreement: A,
    kdf: K,
    mac: M,
    cipher: Option<PaddedBlockCipher>,
    state: State,
}

impl<A, K, M> IesEngine<A, K, M>
where
    A: BasicAgreement,
    K: DerivationFunction,
    M: Mac,
{
    /// Creates an engine that masks the body with derived keystream.
    pub fn new(agreement: A, kdf: K, mac: M) -> Self {
        Self { agreement, kdf, mac, cipher: None, state: State::Uninitialized }
    }

    /// Creates an engine that encrypts the body with `cipher`.
    pub fn with_cipher(agreement: A, kdf: K, mac: M, cipher: PaddedBlockCipher) -> Self {
        Self { agreement, kdf, mac, cipher: Some(cipher), state: State::Uninitialized }
    }

    pub fn mac(&self) -> &M {
        &self.mac
    }

    pub fn cipher(&self) -> Option<&PaddedBlockCipher> {
        self.cipher.as_ref()
    }

    /// Returns the agreement, derivation function, MAC and cipher the engine was built from.
    pub fn into_parts(self) -> (A, K, M, Option<PaddedBlockCipher>) {
        (self.agreement, self.kdf, self.mac, self.cipher)
    }

    /// Parameters matching the configured cipher: 64-bit keys for DES, 128-bit keys otherwise
    /// and a 128-bit MAC key when there is no cipher.
    pub fn default_parameters(&self, nonce: Option<&[u8]>) -> IesParameters {
        let Some(cipher) = &self.cipher else {
            return IesParameters::new(128);
        };
        let bits = if cipher.underlying_algorithm() == "DES" { 64 } else { 128 };
        let params = IesParameters::new(bits).with_cipher_key_size(bits);
        match nonce {
            Some(nonce) => params.with_nonce(nonce),
            None => params,
        }
    }

    /// Prepares the engine for one [`IesEngine::process_block`].
    ///
    /// Any earlier initialisation is discarded, also when this call fails.
    ///
    /// # Errors
    /// Returns [`IesError::InvalidKey`] if `keys` cannot be used in `direction` or mixes curves,
    /// and [`IesError::InvalidParameters`] if the key sizes or nonce do not fit the engine.
    pub fn init(
        &mut self,
        direction: Direction,
        keys: IesKeys,
        params: IesParameters,
    ) -> Result<(), IesError> {
        self.state = State::Uninitialized;
        keys.validate(direction)?;
        self.check_parameters(&params)?;

        let cipher = self.cipher.as_ref().map(PaddedBlockCipher::algorithm_name);
        debug!(
            ?direction,
            keys = keys.mode(),
            cipher = cipher.as_deref().unwrap_or("none"),
            mac_key_bits = params.mac_key_size(),
            cipher_key_bits = ?params.cipher_key_size(),
            "IES engine initialised"
        );

        self.state = State::Ready(Session { direction, keys, params });
        Ok(())
    }

    /// Encrypts `input` into an envelope, or opens the envelope `input`.
    ///
    /// # Errors
    /// Returns [`IesError::IllegalState`] unless the engine was initialised since the last call.
    /// Encryption reports the failing primitive; every decryption failure is
    /// [`IesError::InvalidCipherText`].
    pub fn process_block(&mut self, input: &[u8]) -> Result<Vec<u8>, IesError> {
        let session = match mem::replace(&mut self.state, State::Finalized) {
            State::Ready(session) => session,
            State::Uninitialized => {
                self.state = State::Uninitialized;
                return Err(IesError::IllegalState("IES engine not initialised"));
            },
            State::Finalized => {
                return Err(IesError::IllegalState("IES engine must be re-initialised"));
            },
        };

        let result = match session.direction {
            Direction::Encrypt => self.encrypt(&session, input),
            Direction::Decrypt => self.decrypt(&session, input).map_err(|_| {
                debug!(len = input.len(), "IES envelope rejected");
                IesError::InvalidCipherText
            }),
        };
        self.clear_primitives();
        result
    }

    /// Upper bound on the output of [`IesEngine::process_block`] for `len` input bytes.
    ///
    /// # Errors
    /// Returns [`IesError::IllegalState`] unless the engine is initialised and
    /// [`IesError::InvalidParameters`] if the envelope length does not fit in a `usize`.
    pub fn output_size(&self, len: usize) -> Result<usize, IesError> {
        let State::Ready(session) = &self.state else {
            return Err(IesError::IllegalState("IES engine not initialised"));
        };
        let mac_len = self.mac.mac_size();

        match (&session.keys, session.direction) {
            (keys, Direction::Encrypt) => {
                let v_len = match keys {
                    IesKeys::Ephemeral { ephemeral, .. } => ephemeral.encoded_public_key().len(),
                    _ => 0,
                };
                let body_len = match &self.cipher {
                    Some(cipher) => {
                        let block_size = cipher.block_size();
                        (len / block_size).checked_add(1).and_then(|n| n.checked_mul(block_size))
                    },
                    None => Some(len),
                };
                body_len
                    .and_then(|body_len| body_len.checked_add(v_len + mac_len))
                    .ok_or(IesError::InvalidParameters("input too long for an IES envelope"))
            },
            (keys, Direction::Decrypt) => {
                // the shortest encoding bounds the plaintext from above
                let v_len = match keys {
                    IesKeys::Recipient { private } => private.curve().compressed_point_len(),
                    _ => 0,
                };
                Ok(len.saturating_sub(v_len + mac_len))
            },
        }
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    /// Drops every key the primitives were given during [`IesEngine::process_block`].
    fn clear_primitives(&mut self) {
        self.agreement.clear();
        self.mac.clear();
        if let Some(cipher) = self.cipher.as_mut() {
            cipher.clear();
        }
    }

    fn check_parameters(&self, params: &IesParameters) -> Result<(), IesError> {
        if !is_byte_multiple(params.mac_key_size()) {
            return Err(IesError::InvalidParameters(
                "MAC key size must be a positive multiple of 8 bits",
            ));
        }

        let Some(cipher) = &self.cipher else {
            if params.cipher_key_size().is_some() || params.nonce().is_some() {
                return Err(IesError::InvalidParameters(
                    "cipher parameters given without a cipher",
                ));
            }
            return Ok(());
        };

        let bits = params
            .cipher_key_size()
            .ok_or(IesError::InvalidParameters("cipher key size is required"))?;
        if !is_byte_multiple(bits) {
            return Err(IesError::InvalidParameters(
                "cipher key size must be a positive multiple of 8 bits",
            ));
        }
        if params.nonce().is_some_and(|nonce| nonce.len() != cipher.block_size()) {
            return Err(IesError::InvalidParameters("nonce must be one cipher block long"));
        }
        Ok(())
    }

    fn key_layout(&self, params: &IesParameters, body_len: usize, has_v: bool) -> KeyLayout {
        let mac_len = params.mac_key_size() / 8;
        match (&self.cipher, params.cipher_key_size()) {
            (Some(_), Some(bits)) => {
                let cipher_len = bits / 8;
                KeyLayout { cipher: 0..cipher_len, mac: cipher_len..cipher_len + mac_len }
            },
            _ if has_v => KeyLayout { mac: 0..mac_len, cipher: mac_len..mac_len + body_len },
            _ => KeyLayout { cipher: 0..body_len, mac: body_len..body_len + mac_len },
        }
    }

    fn derive_key(
        &mut self,
        private: &SecretKey,
        peer: &PublicKey,
        v: &[u8],
        params: &IesParameters,
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        self.agreement.init(private, None)?;
        let shared = self.agreement.calculate_agreement(peer)?;

        let mut secret = Zeroizing::new(Vec::with_capacity(v.len() + shared.len()));
        secret.extend_from_slice(v);
        secret.extend_from_slice(shared.as_bytes());
        self.kdf.derive(&secret, params.derivation(), len)
    }

    fn compute_tag(
        &mut self,
        mac_key: &[u8],
        body: &[u8],
        has_v: bool,
        params: &IesParameters,
    ) -> Result<Vec<u8>, CryptoError> {
        self.mac.init(mac_key)?;
        self.mac.update(body)?;
        self.mac.update(params.encoding())?;
        if has_v {
            let bits = params.encoding().len() as u64 * 8;
            self.mac.update(&bits.to_be_bytes())?;
        }

        let mut tag = vec![0u8; self.mac.mac_size()];
        self.mac.do_final(&mut tag)?;
        Ok(tag)
    }

    fn encrypt(&mut self, session: &Session, input: &[u8]) -> Result<Vec<u8>, IesError> {
        let (private, peer, v) = match &session.keys {
            IesKeys::Ephemeral { recipient, ephemeral } => {
                (ephemeral.secret_key(), recipient, ephemeral.encoded_public_key())
            },
            IesKeys::Static { private, peer } => (private, peer, &[][..]),
            IesKeys::Recipient { .. } => {
                return Err(IesError::InvalidKey("recipient keys can only decrypt"));
            },
        };
        let params = &session.params;
        let has_v = session.keys.has_ephemeral();

        let layout = self.key_layout(params, input.len(), has_v);
        let key = self.derive_key(private, peer, v, params, layout.len())?;

        let body = match self.cipher.as_mut() {
            Some(cipher) => {
                cipher.init(Direction::Encrypt, &key[layout.cipher.clone()], params.nonce())?;
                cipher.do_final(input)?
            },
            None => {
                let mut body = input.to_vec();
                xor_in_place(&mut body, &key[layout.cipher.clone()]);
                body
            },
        };
        let tag = self.compute_tag(&key[layout.mac], &body, has_v, params)?;

        let mut envelope = Vec::with_capacity(v.len() + tag.len() + body.len());
        envelope.extend_from_slice(v);
        envelope.extend_from_slice(&tag);
        envelope.extend_from_slice(&body);
        Ok(envelope)
    }

    fn decrypt(&mut self, session: &Session, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (private, peer, v_len) = match &session.keys {
            IesKeys::Recipient { private } => {
                let (peer, consumed) = read_public_key(private.curve(), input)?;
                (private, peer, consumed)
            },
            IesKeys::Static { private, peer } => (private, peer.clone(), 0),
            IesKeys::Ephemeral { .. } => {
                return Err(CryptoError::InvalidKey("ephemeral keys can only encrypt"));
            },
        };
        let params = &session.params;
        let has_v = session.keys.has_ephemeral();

        let mac_len = self.mac.mac_size();
        let body_len = input
            .len()
            .checked_sub(v_len)
            .and_then(|len| len.checked_sub(mac_len))
            .ok_or(CryptoError::InvalidCipherText)?;
        let (v, rest) = input.split_at(v_len);
        let (tag, body) = rest.split_at(mac_len);
        debug_assert_eq!(body.len(), body_len);

        let layout = self.key_layout(params, body_len, has_v);
        let key = self.derive_key(private, &peer, v, params, layout.len())?;

        let expected = self.compute_tag(&key[layout.mac.clone()], body, has_v, params)?;
        if !constant_time_eq(&expected, tag) {
            return Err(CryptoError::InvalidCipherText);
        }

        match self.cipher.as_mut() {
            Some(cipher) => {
                cipher.init(Direction::Decrypt, &key[layout.cipher], params.nonce())?;
                cipher.do_final(body)
            },
            None => {
                let mut plaintext = body.to_vec();
                xor_in_place(&mut plaintext, &key[layout.cipher]);
                Ok(plaintext)
            },
        }
    }
}

fn is_byte_multiple(bits: usize) -> bool {
    bits != 0 && bits % 8 == 0
}
