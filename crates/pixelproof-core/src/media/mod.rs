pub mod capacity;
pub mod lsb;
pub mod payload;
pub mod pixel_buffer;

pub use capacity::{capacity, ensure_capacity, required_channels, LENGTH_HEADER_BITS};
pub use lsb::{embed, extract, LsbCodec};
pub use pixel_buffer::{decode, encode, PixelBuffer, CHANNELS, LOSSLESS_FORMAT};
