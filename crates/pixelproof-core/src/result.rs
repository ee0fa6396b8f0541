use crate::error::PixelProofError;

pub type Result<T> = std::result::Result<T, PixelProofError>;
