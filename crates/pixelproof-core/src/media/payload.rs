use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use super::capacity::{required_channels, LENGTH_HEADER_BITS};
use crate::error::PixelProofError;
use crate::result::Result;

/// Frames a payload into the stream that gets hidden in the carrier
pub trait PayloadEncoder {
    fn encode(&self, content: &mut dyn Read) -> Result<Vec<u8>>;
}

/// Recovers a payload from the stream unveiled from a carrier
pub trait PayloadDecoder {
    fn decode(&self, content: &mut dyn Read) -> Result<Vec<u8>>;
}

/// `[length: u32 big-endian][payload bytes]`
#[derive(Debug, Default)]
pub struct PayloadEncoderWithLengthHeader;

impl PayloadEncoder for PayloadEncoderWithLengthHeader {
    fn encode(&self, content: &mut dyn Read) -> Result<Vec<u8>> {
        let mut src = Vec::new();
        content.read_to_end(&mut src)?;
        let len = u32::try_from(src.len()).map_err(|_| PixelProofError::PayloadTooLarge(src.len()))?;

        let mut buffer = Vec::with_capacity(src.len() + 4);
        buffer.write_u32::<BigEndian>(len)?;
        buffer.extend_from_slice(&src[..]);

        Ok(buffer)
    }
}

/// Reads the length header and then exactly that many payload bytes.
///
/// `channels` is the number of channel values the stream was unveiled from, a declared
/// length that cannot fit into them is rejected before any payload byte is read.
#[derive(Debug)]
pub struct PayloadDecoderWithLengthHeader {
    channels: usize,
}

impl PayloadDecoderWithLengthHeader {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }
}

impl PayloadDecoder for PayloadDecoderWithLengthHeader {
    fn decode(&self, content: &mut dyn Read) -> Result<Vec<u8>> {
        if self.channels < LENGTH_HEADER_BITS {
            return Err(PixelProofError::CorruptStream {
                length: 0,
                available: self.channels,
            });
        }

        let len = content.read_u32::<BigEndian>()?;
        debug!("Length header declares {len} payload bytes");
        let fits = usize::try_from(len)
            .map(|len| required_channels(len) <= self.channels)
            .unwrap_or(false);
        if !fits {
            return Err(PixelProofError::CorruptStream {
                length: len as u64,
                available: self.channels,
            });
        }

        let mut buffer = vec![0; len as usize];
        content.read_exact(&mut buffer)?;

        Ok(buffer)
    }
}
