mod decoder;
mod encoder;

pub use decoder::{LsbDecoder, OneBitUnveil, UnveilAlgorithm};
pub use encoder::{HideAlgorithm, LsbEncoder, OneBitHide};

use std::io::{Read, Write};

use log::debug;

use super::capacity::ensure_capacity;
use super::payload::{
    PayloadDecoder, PayloadDecoderWithLengthHeader, PayloadEncoder, PayloadEncoderWithLengthHeader,
};
use super::pixel_buffer::PixelBuffer;
use crate::result::Result;

/// Factory for decoder and encoder, both walk the channels in the same row-major scan order
pub struct LsbCodec;

impl LsbCodec {
    /// builds a LSB decoder that implements Read
    pub fn decoder(input: &PixelBuffer) -> Box<dyn Read + '_> {
        Box::new(LsbDecoder::new(input.as_slice().iter(), OneBitUnveil))
    }

    /// builds a LSB encoder that implements Write
    pub fn encoder(carrier: &mut PixelBuffer) -> Box<dyn Write + '_> {
        Box::new(LsbEncoder::new(carrier.as_mut_slice().iter_mut(), OneBitHide))
    }
}

/// Hides `payload` behind a 32-bit big-endian length header in the least significant
/// bits of a copy of `buffer`.
///
/// The capacity is checked before anything is written, the caller's buffer is never touched.
/// Embedding is deterministic, the same buffer and payload always give identical output.
pub fn embed(buffer: &PixelBuffer, payload: &[u8]) -> Result<PixelBuffer> {
    ensure_capacity(buffer.len(), payload.len())?;
    let stream = PayloadEncoderWithLengthHeader.encode(&mut &payload[..])?;

    let mut carrier = buffer.clone();
    LsbCodec::encoder(&mut carrier).write_all(&stream)?;
    debug!("Embedded {} payload bytes", payload.len());

    Ok(carrier)
}

/// Recovers a payload hidden by `embed`.
///
/// Fails with `CorruptStream` when the length header does not fit into the carrier,
/// which is what a plain image yields in all but roughly `capacity / 2^32` of the cases:
/// its low bits decode to an arbitrary 32-bit length, and only lengths up to the
/// capacity are plausible.
pub fn extract(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut decoder = LsbCodec::decoder(buffer);
    PayloadDecoderWithLengthHeader::new(buffer.len()).decode(&mut decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PixelProofError;
    use crate::media::capacity::capacity;
    use crate::test_utils::prepare_carrier;

    fn carrier(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_rgb_image(prepare_carrier(width, height))
    }

    #[test]
    fn should_embed_and_extract_a_secret() {
        let plain = carrier(10, 10);
        let secret = b"ABCD1234";

        let image_with_secret = embed(&plain, secret).expect("Cannot embed secret");
        let unveiled = extract(&image_with_secret).expect("Cannot extract secret");

        assert_eq!(unveiled, secret);
    }

    #[test]
    fn should_embed_an_empty_payload() {
        let plain = carrier(4, 4);
        let image_with_secret = embed(&plain, b"").expect("Cannot embed empty payload");
        assert_eq!(extract(&image_with_secret).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn should_write_the_length_header_into_the_first_32_channels() {
        let plain = PixelBuffer::from_raw(4, 4, vec![0xff; 48]).unwrap();
        let image_with_secret = embed(&plain, b"A").expect("Cannot embed secret");
        let channels = image_with_secret.as_slice();

        // length 1 => 31 zero bits followed by a single one bit
        assert!(channels[..31].iter().all(|c| *c == 0xfe));
        assert_eq!(channels[31], 0xff);
        // 'A' = 0b0100_0001
        let bits: Vec<u8> = channels[32..40].iter().map(|c| c & 1).collect();
        assert_eq!(bits, vec![0, 1, 0, 0, 0, 0, 0, 1]);
        // nothing beyond the stream was touched
        assert!(channels[40..].iter().all(|c| *c == 0xff));
    }

    #[test]
    fn should_change_each_channel_by_at_most_one() {
        let plain = carrier(12, 9);
        let payload = vec![0xa5; capacity(plain.len())];
        let image_with_secret = embed(&plain, &payload).expect("Cannot embed secret");

        for (before, after) in plain.as_slice().iter().zip(image_with_secret.as_slice()) {
            assert!((*before as i16 - *after as i16).abs() <= 1);
        }
    }

    #[test]
    fn should_not_mutate_the_callers_buffer() {
        let plain = carrier(8, 8);
        let snapshot = plain.clone();

        let _ = embed(&plain, b"hidden").expect("Cannot embed secret");

        assert_eq!(plain, snapshot);
    }

    #[test]
    fn should_be_deterministic() {
        let plain = carrier(16, 16);
        let first = embed(&plain, b"same input").unwrap();
        let second = embed(&plain, b"same input").unwrap();

        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn should_accept_a_payload_filling_the_carrier_exactly() {
        // 8x8 pixel => 192 channels => (192 - 32) / 8 = 20 bytes
        let plain = carrier(8, 8);
        let payload = [0x42; 20];

        let image_with_secret = embed(&plain, &payload).expect("Exact fit must be accepted");
        assert_eq!(extract(&image_with_secret).unwrap(), payload);
    }

    #[test]
    fn should_refuse_a_payload_one_byte_too_large() {
        let plain = carrier(8, 8);

        match embed(&plain, &[0x42; 21]) {
            Err(PixelProofError::CapacityExceeded {
                required,
                available,
            }) => {
                assert_eq!(required, 32 + 21 * 8);
                assert_eq!(available, 192);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn should_refuse_when_the_carrier_is_one_channel_short() {
        // 3 payload bytes need 56 channels, this raw buffer has 54
        let plain = PixelBuffer::from_raw(6, 3, vec![7; 54]).unwrap();
        assert!(matches!(
            embed(&plain, b"abc"),
            Err(PixelProofError::CapacityExceeded {
                required: 56,
                available: 54
            })
        ));
        assert!(embed(&plain, b"ab").is_ok());
    }

    #[test]
    fn should_report_corrupt_stream_for_a_plain_image() {
        // the first red channel is odd, so the length header starts with a one bit
        let plain = carrier(10, 10);
        let err = extract(&plain).expect_err("Plain image must not carry a payload");
        assert!(err.is_corrupt_stream());
    }

    #[test]
    fn should_report_corrupt_stream_for_tiny_carriers() {
        let plain = PixelBuffer::from_raw(2, 2, vec![0; 12]).unwrap();
        assert!(extract(&plain).unwrap_err().is_corrupt_stream());
    }

    #[test]
    fn should_report_corrupt_stream_for_a_length_exceeding_the_carrier() {
        // header of all zeros except the lowest bit set twice => length 3, needs 56 channels
        let mut channels = vec![0u8; 48];
        channels[30] = 1;
        channels[31] = 1;
        let plain = PixelBuffer::from_raw(4, 4, channels).unwrap();

        match extract(&plain) {
            Err(PixelProofError::CorruptStream { length, available }) => {
                assert_eq!(length, 3);
                assert_eq!(available, 48);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
