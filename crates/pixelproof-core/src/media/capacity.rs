use log::debug;

use crate::error::PixelProofError;
use crate::result::Result;

/// bits occupied by the big-endian length header in front of every payload
pub const LENGTH_HEADER_BITS: usize = 32;

/// Maximum number of payload bytes a carrier with `buffer_len` channel values can hold,
/// `floor((buffer_len - 32) / 8)` and 0 for carriers smaller than the header.
pub fn capacity(buffer_len: usize) -> usize {
    buffer_len.saturating_sub(LENGTH_HEADER_BITS) / 8
}

/// channel values needed to carry a payload of `payload_len` bytes plus its header
pub fn required_channels(payload_len: usize) -> usize {
    payload_len
        .saturating_mul(8)
        .saturating_add(LENGTH_HEADER_BITS)
}

/// Fails with `CapacityExceeded` unless `32 + 8 * payload_len <= buffer_len`.
pub fn ensure_capacity(buffer_len: usize, payload_len: usize) -> Result<()> {
    let required = required_channels(payload_len);
    debug!("Payload needs {required} of {buffer_len} channel values");

    if required > buffer_len {
        return Err(PixelProofError::CapacityExceeded {
            required,
            available: buffer_len,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_clamp_capacity_of_tiny_carriers_to_zero() {
        assert_eq!(capacity(0), 0);
        assert_eq!(capacity(31), 0);
        assert_eq!(capacity(32), 0);
        assert_eq!(capacity(39), 0);
    }

    #[test]
    fn should_floor_capacity_to_whole_bytes() {
        assert_eq!(capacity(40), 1);
        assert_eq!(capacity(47), 1);
        assert_eq!(capacity(48), 2);
        // a 100x100 RGB image
        assert_eq!(capacity(30_000), 3_746);
    }

    #[test]
    fn should_accept_payload_filling_the_carrier_exactly() {
        assert!(ensure_capacity(32 + 8 * 5, 5).is_ok());
        assert!(ensure_capacity(32, 0).is_ok());
    }

    #[test]
    fn should_refuse_payload_one_bit_too_large() {
        match ensure_capacity(32 + 8 * 5 - 1, 5) {
            Err(PixelProofError::CapacityExceeded {
                required,
                available,
            }) => {
                assert_eq!(required, 72);
                assert_eq!(available, 71);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn should_not_overflow_for_huge_payload_lengths() {
        assert_eq!(required_channels(usize::MAX), usize::MAX);
        assert!(ensure_capacity(usize::MAX - 1, usize::MAX).is_err());
    }
}
