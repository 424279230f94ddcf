//! Small byte helpers shared by the modes, MACs and the IES engine.

use subtle::ConstantTimeEq;

/// XORs `src` into `dst` over the length of the shorter slice.
#[inline]
pub(crate) fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Constant-time equality for tags. Slices of different length compare unequal.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Checks that `input` and `output` can each hold one block of `block_size` bytes.
pub(crate) fn check_block_buffers(
    input: &[u8],
    output: &[u8],
    block_size: usize,
) -> Result<(), crate::CryptoError> {
    if input.len() < block_size {
        return Err(crate::CryptoError::DataLength("input buffer too short"));
    }
    if output.len() < block_size {
        return Err(crate::CryptoError::DataLength("output buffer too short"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_stops_at_shorter_slice() {
        let mut dst = [0xffu8; 4];
        xor_in_place(&mut dst, &[0x0f, 0xf0]);
        assert_eq!(dst, [0xf0, 0x0f, 0xff, 0xff]);
    }

    #[test]
    fn constant_time_eq_rejects_length_mismatch() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
