use alloc::string::String;
use core::fmt;

use ::hmac::{
    SimpleHmac,
    digest::{Digest, KeyInit, core_api::BlockSizeUser},
};

use super::{Mac, check_mac_output};
use crate::CryptoError;

/// HMAC (RFC 2104) over any fixed-output hash.
///
/// Keeps a keyed copy of the inner and outer state so that finishing a tag restores the
/// post-`init` state without rehashing the key.
pub struct HMac<D: Digest + BlockSizeUser + Clone> {
    keyed: Option<SimpleHmac<D>>,
    running: Option<SimpleHmac<D>>,
}

impl<D: Digest + BlockSizeUser + Clone> HMac<D> {
    pub fn new() -> Self {
        Self { keyed: None, running: None }
    }
}

impl<D: Digest + BlockSizeUser + Clone> Default for HMac<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + BlockSizeUser + Clone> fmt::Debug for HMac<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HMac")
            .field("keyed", &self.keyed.is_some())
            .field("mac_size", &<D as Digest>::output_size())
            .finish()
    }
}

impl<D: Digest + BlockSizeUser + Clone> Mac for HMac<D> {
    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        let keyed = <SimpleHmac<D> as KeyInit>::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKey("HMAC key rejected"))?;
        self.running = Some(keyed.clone());
        self.keyed = Some(keyed);
        Ok(())
    }

    fn mac_size(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn update(&mut self, input: &[u8]) -> Result<(), CryptoError> {
        let running =
            self.running.as_mut().ok_or(CryptoError::IllegalState("HMAC not initialised"))?;
        ::hmac::Mac::update(running, input);
        Ok(())
    }

    fn do_final(&mut self, out: &mut [u8]) -> Result<usize, CryptoError> {
        let size = self.mac_size();
        check_mac_output(out, size)?;
        let keyed = self.keyed.as_ref().ok_or(CryptoError::IllegalState("HMAC not initialised"))?;

        let finished = self.running.replace(keyed.clone());
        let Some(finished) = finished else {
            return Err(CryptoError::IllegalState("HMAC not initialised"));
        };
        let tag = ::hmac::Mac::finalize(finished).into_bytes();
        out[..size].copy_from_slice(&tag);
        Ok(size)
    }

    fn reset(&mut self) {
        self.running = self.keyed.clone();
    }

    fn clear(&mut self) {
        self.keyed = None;
        self.running = None;
    }

    fn algorithm_name(&self) -> String {
        format!("HMAC/{}", <D as Digest>::output_size() * 8)
    }
}
