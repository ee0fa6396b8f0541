use log::info;

use crate::error::PixelProofError;
use crate::media::{decode, embed, encode};
use crate::registry::{SecretRecord, SecretRegistry};
use crate::result::Result;
use crate::secret::{generate_secret, SecretOptions};

pub fn prepare() -> EmbedApi {
    EmbedApi::default()
}

/// Builder for hiding a secret in an image and registering it as issued.
///
/// The secret is never part of `Debug` output.
#[derive(Default)]
pub struct EmbedApi {
    image: Option<Vec<u8>>,
    secret: Option<Vec<u8>>,
    filename: Option<String>,
}

/// The PNG that carries the secret and the record stored for it
#[derive(Debug, Clone)]
pub struct Embedded {
    pub image: Vec<u8>,
    pub record: SecretRecord,
}

impl EmbedApi {
    /// The carrier image as uploaded, PNG or JPEG
    pub fn with_image_bytes(mut self, image: impl Into<Vec<u8>>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_secret(mut self, secret: impl AsRef<[u8]>) -> Self {
        self.secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Uses a freshly generated secret, it is readable afterwards from the returned record
    pub fn with_generated_secret(mut self, options: &SecretOptions) -> Self {
        self.secret = Some(generate_secret(options).into_bytes());
        self
    }

    /// Name of the output file, blanks are trimmed, inner spaces become `_` and `.png` is appended
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// Hides the secret and registers it.
    ///
    /// Nothing is registered unless the carrier decodes and is large enough for the secret.
    pub fn execute<R: SecretRegistry>(self, registry: &R) -> Result<Embedded> {
        let Some(image) = self.image else {
            return Err(PixelProofError::MissingCarrier);
        };
        let Some(secret) = self.secret.filter(|s| !s.is_empty()) else {
            return Err(PixelProofError::MissingSecret);
        };
        let filename = self
            .filename
            .as_deref()
            .and_then(safe_filename)
            .ok_or(PixelProofError::MissingFilename)?;

        let carrier = decode(&image)?;
        let image_with_secret = encode(&embed(&carrier, &secret)?)?;

        let record = SecretRecord::new(filename, secret, image_with_secret.clone());
        registry.insert(record.clone())?;
        info!("Issued secret for {}", record.filename);

        Ok(Embedded {
            image: image_with_secret,
            record,
        })
    }
}

/// `" my holiday "` becomes `"my_holiday.png"`, blank names are rejected
pub fn safe_filename(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(format!("{}.png", name.replace(' ', "_")))
}
