use std::io::Cursor;

use image::{ColorType, DynamicImage, ImageFormat, RgbImage};
use log::{debug, error};

use crate::error::PixelProofError;
use crate::result::Result;

/// number of color channels per pixel after normalization
pub const CHANNELS: usize = 3;

/// the only container a carrier is ever written to
pub const LOSSLESS_FORMAT: ImageFormat = ImageFormat::Png;

/// Flat RGB channel values of a carrier image in row-major order,
/// that is pixel 0 red, pixel 0 green, pixel 0 blue, pixel 1 red, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl PixelBuffer {
    /// wraps raw channel values, `channels.len()` must equal `width * height * 3`
    pub fn from_raw(width: u32, height: u32, channels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS));

        match expected {
            Some(expected) if expected == channels.len() && expected > 0 => Ok(Self {
                width,
                height,
                channels,
            }),
            _ => Err(PixelProofError::InvalidDimensions {
                width,
                height,
                len: channels.len(),
            }),
        }
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// number of channel values, one bit of the encoded stream fits into each
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.channels
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.channels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.channels
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.channels.clone()).ok_or(
            PixelProofError::InvalidDimensions {
                width: self.width,
                height: self.height,
                len: self.channels.len(),
            },
        )
    }
}

/// Decodes any supported raster image (PNG, JPEG) into an RGB `PixelBuffer`.
///
/// Alpha channels are dropped, greyscale and palette images are expanded to RGB
/// and 16-bit images are narrowed to 8 bit. Lossy input is decoded once here,
/// the resulting buffer is the lossless carrier from then on.
pub fn decode(image_bytes: &[u8]) -> Result<PixelBuffer> {
    let format = image::guess_format(image_bytes).map_err(|e| {
        debug!("Cannot guess image format: {e}");
        PixelProofError::UnsupportedFormat
    })?;
    let image = image::load_from_memory_with_format(image_bytes, format).map_err(|e| {
        debug!("Cannot decode {format:?} image: {e}");
        PixelProofError::UnsupportedFormat
    })?;

    normalize(image)
}

fn normalize(image: DynamicImage) -> Result<PixelBuffer> {
    let rgb = match image.color() {
        ColorType::Rgb8
        | ColorType::L8
        | ColorType::La8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => image.into_rgb8(),
        other => return Err(PixelProofError::ColorModeError(format!("{other:?}"))),
    };

    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(PixelProofError::InvalidDimensions {
            width,
            height,
            len: 0,
        });
    }

    Ok(PixelBuffer::from_rgb_image(rgb))
}

/// Encodes a `PixelBuffer` as PNG, the only container that preserves the embedded bits.
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let image = buffer.to_rgb_image()?;
    let mut writer = Cursor::new(Vec::new());
    image.write_to(&mut writer, LOSSLESS_FORMAT).map_err(|e| {
        error!("Error saving image: {e}");
        PixelProofError::ImageEncodingError
    })?;

    Ok(writer.into_inner())
}
