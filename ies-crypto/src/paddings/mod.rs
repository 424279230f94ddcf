//! Block padding schemes used by [`crate::modes::PaddedBlockCipher`] and the block-cipher MACs.

use core::fmt;

use crate::CryptoError;

/// A scheme that fills the tail of a final block and can later recognise what it added.
pub trait BlockPadding: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Pads `block[offset..]` in place and returns the number of bytes added.
    ///
    /// `offset` must be strictly less than `block.len()`.
    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize;

    /// Returns how many trailing bytes of `block` are padding.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidCipherText`] if the block does not end in valid padding.
    fn pad_count(&self, block: &[u8]) -> Result<usize, CryptoError>;
}

// PKCS#7
// ================================================================================================

/// PKCS#7 / PKCS#5 padding: `n` bytes of value `n`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pkcs7Padding;

impl BlockPadding for Pkcs7Padding {
    fn name(&self) -> &'static str {
        "PKCS7"
    }

    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize {
        debug_assert!(offset < block.len());
        let count = block.len() - offset;
        block[offset..].fill(count as u8);
        count
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, CryptoError> {
        let len = block.len();
        let Some(&last) = block.last() else {
            return Err(CryptoError::InvalidCipherText);
        };
        let count = usize::from(last);

        // examine every byte so the running time does not depend on the padding length
        let mut bad = u8::from(count == 0) | u8::from(count > len);
        for (i, &byte) in block.iter().enumerate() {
            let in_padding = u8::from(len - i <= count);
            bad |= in_padding & u8::from(byte != last);
        }

        if bad != 0 {
            return Err(CryptoError::InvalidCipherText);
        }
        Ok(count)
    }
}

// ISO 7816-4
// ================================================================================================

/// ISO/IEC 7816-4 padding: a single `0x80` followed by zero bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Iso7816d4Padding;

impl BlockPadding for Iso7816d4Padding {
    fn name(&self) -> &'static str {
        "ISO7816-4"
    }

    fn add_padding(&self, block: &mut [u8], offset: usize) -> usize {
        debug_assert!(offset < block.len());
        block[offset] = 0x80;
        block[offset + 1..].fill(0);
        block.len() - offset
    }

    fn pad_count(&self, block: &[u8]) -> Result<usize, CryptoError> {
        let marker = block
            .iter()
            .rposition(|&b| b != 0)
            .ok_or(CryptoError::InvalidCipherText)?;
        if block[marker] != 0x80 {
            return Err(CryptoError::InvalidCipherText);
        }
        Ok(block.len() - marker)
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(7)]
    fn pkcs7_padding_is_recognised(#[case] offset: usize) {
        let mut block = [0x41u8; 8];
        let added = Pkcs7Padding.add_padding(&mut block, offset);
        assert_eq!(added, 8 - offset);
        assert!(block[offset..].iter().all(|&b| usize::from(b) == added));
        assert_eq!(Pkcs7Padding.pad_count(&block).unwrap(), added);
    }

    #[rstest]
    #[case::zero_count([1, 2, 3, 4, 5, 6, 7, 0])]
    #[case::count_exceeds_block([9, 9, 9, 9, 9, 9, 9, 9])]
    #[case::inconsistent_bytes([1, 2, 3, 4, 5, 3, 2, 3])]
    fn malformed_pkcs7_padding_is_rejected(#[case] block: [u8; 8]) {
        assert_matches!(Pkcs7Padding.pad_count(&block), Err(CryptoError::InvalidCipherText));
    }

    #[test]
    fn iso7816_padding_is_recognised() {
        let mut block = [0x11u8; 16];
        assert_eq!(Iso7816d4Padding.add_padding(&mut block, 5), 11);
        assert_eq!(block[5], 0x80);
        assert!(block[6..].iter().all(|&b| b == 0));
        assert_eq!(Iso7816d4Padding.pad_count(&block).unwrap(), 11);

        let mut full = [0u8; 16];
        assert_eq!(Iso7816d4Padding.add_padding(&mut full, 0), 16);
        assert_eq!(Iso7816d4Padding.pad_count(&full).unwrap(), 16);
    }

    #[test]
    fn malformed_iso7816_padding_is_rejected() {
        assert_matches!(Iso7816d4Padding.pad_count(&[0u8; 8]), Err(CryptoError::InvalidCipherText));
        assert_matches!(
            Iso7816d4Padding.pad_count(&[1, 2, 3, 4, 5, 6, 7, 8]),
            Err(CryptoError::InvalidCipherText)
        );
    }
}
