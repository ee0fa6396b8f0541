use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelProofError {
    /// Represents input bytes that no supported raster decoder accepts. For example a text file or a broken PNG
    #[error("Image format is not supported")]
    UnsupportedFormat,

    /// Represents a decoded image whose color type cannot be reduced to 8-bit RGB
    #[error("Color mode cannot be normalized to RGB: {0}")]
    ColorModeError(String),

    /// Represents raw channel data that does not match the given dimensions
    #[error("Invalid pixel buffer: {len} channel values do not describe a {width}x{height} RGB image")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    /// Represents a payload that does not fit into the carrier, both numbers count channel values
    #[error(
        "Capacity Error: the payload requires {required} channel values but the carrier image only provides {available}"
    )]
    CapacityExceeded { required: usize, available: usize },

    /// Represents a payload longer than the 32-bit length header can describe
    #[error("Payload of {0} bytes cannot be described by a 32-bit length header")]
    PayloadTooLarge(usize),

    /// Represents a carrier that holds no valid length-prefixed payload, this is the normal outcome for a plain image
    #[error("No valid payload found: declared length {length} does not fit into {available} channel values")]
    CorruptStream { length: u64, available: usize },

    /// Represents a failure when encoding the carrier into a lossless image container
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure of the secret registry or the detection log, for example an unreadable store
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Represents an attempt to register a secret that was already issued
    #[error("Secret is already registered")]
    DuplicateSecret,

    #[error("API Error: Missing carrier image")]
    MissingCarrier,

    #[error("API Error: Missing secret")]
    MissingSecret,

    #[error("API Error: Missing output file name")]
    MissingFilename,

    /// Represents a failure to (de-)serialize a registry record
    #[error("Registry record serialization error")]
    SerializationError(#[from] serde_json::Error),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl PixelProofError {
    /// true for the outcome of reading a carrier that never had a payload embedded
    pub fn is_corrupt_stream(&self) -> bool {
        matches!(self, PixelProofError::CorruptStream { .. })
    }
}
