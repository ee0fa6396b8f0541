use std::io::{Read, Result};

use bitstream_io::{BigEndian, BitWrite, BitWriter};

/// generic unveil algorithm, reads one bit back out of a channel value
pub trait UnveilAlgorithm {
    fn unveil(&self, channel: u8) -> bool;
}

/// default 1 bit unveil strategy, counterpart of `OneBitHide`
#[derive(Debug, Default, Clone, Copy)]
pub struct OneBitUnveil;

impl UnveilAlgorithm for OneBitUnveil {
    #[inline(always)]
    fn unveil(&self, channel: u8) -> bool {
        channel & 1 == 1
    }
}

/// Reads bytes most significant bit first out of a sequence of channel values.
///
/// Never reads past the end of the channels, when they run out `read` returns
/// the complete bytes gathered so far and `read_exact` fails with `UnexpectedEof`.
pub struct LsbDecoder<I, A> {
    channels: I,
    algorithm: A,
}

impl<I, A> LsbDecoder<I, A> {
    pub fn new(channels: I, algorithm: A) -> Self {
        Self {
            channels,
            algorithm,
        }
    }
}

impl<'a, I, A> Read for LsbDecoder<I, A>
where
    I: Iterator<Item = &'a u8>,
    A: UnveilAlgorithm,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let bits_to_read = buf.len() << 3;
        let mut bit_buffer = BitWriter::endian(buf, BigEndian);

        let mut bits_read = 0;
        for channel in self.channels.by_ref().take(bits_to_read) {
            bit_buffer.write_bit(self.algorithm.unveil(*channel))?;
            bits_read += 1;
        }

        if !bit_buffer.byte_aligned() {
            bit_buffer.byte_align()?;
        }

        Ok(bits_read >> 3)
    }
}
