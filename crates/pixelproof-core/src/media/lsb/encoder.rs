use std::io::{Result, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};

/// generic hiding algorithm, decides how one bit is stored in a channel value
pub trait HideAlgorithm {
    fn hide(&self, channel: &mut u8, bit: bool);
}

/// default 1 bit hiding strategy, overwrites the least significant bit only
#[derive(Debug, Default, Clone, Copy)]
pub struct OneBitHide;

impl HideAlgorithm for OneBitHide {
    #[inline(always)]
    fn hide(&self, channel: &mut u8, bit: bool) {
        *channel = (*channel & (u8::MAX - 1)) | u8::from(bit);
    }
}

/// Writes bytes most significant bit first into a sequence of mutable channel values.
///
/// Every written byte consumes 8 channel values. Once the channels are exhausted
/// `write` reports only the bytes stored completely, `write_all` then fails with `WriteZero`.
pub struct LsbEncoder<I, A> {
    channels: I,
    algorithm: A,
}

impl<I, A> LsbEncoder<I, A> {
    pub fn new(channels: I, algorithm: A) -> Self {
        Self {
            channels,
            algorithm,
        }
    }
}

impl<'a, I, A> Write for LsbEncoder<I, A>
where
    I: Iterator<Item = &'a mut u8>,
    A: HideAlgorithm,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let bits_to_write = buf.len() << 3;
        let mut bits = BitReader::endian(buf, BigEndian);
        let mut bits_written = 0;
        for channel in self.channels.by_ref().take(bits_to_write) {
            self.algorithm.hide(channel, bits.read_bit()?);
            bits_written += 1;
        }

        Ok(bits_written >> 3)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
