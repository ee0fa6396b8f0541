use std::fmt::{self, Display, Formatter};

use log::{debug, warn};

use crate::media::{decode, extract};
use crate::registry::{DetectionLog, DetectionLogEntry, SecretRegistry};
use crate::result::Result;

/// Outcome of verifying a single image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verification {
    /// the recovered payload, `None` if the image carries no readable payload
    pub secret: Option<Vec<u8>>,
    /// true only if the recovered payload is a registered secret
    pub is_real: bool,
}

impl Verification {
    pub fn not_authentic() -> Self {
        Self::default()
    }

    /// the recovered payload as text, if it is valid UTF-8
    pub fn secret_str(&self) -> Option<&str> {
        self.secret
            .as_deref()
            .and_then(|s| std::str::from_utf8(s).ok())
    }
}

/// The four mutually exclusive outcomes of comparing two images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    FirstRealOnly,
    SecondRealOnly,
    NeitherReal,
    BothAppearReal,
}

impl Verdict {
    pub fn classify(first_is_real: bool, second_is_real: bool) -> Self {
        match (first_is_real, second_is_real) {
            (true, false) => Verdict::FirstRealOnly,
            (false, true) => Verdict::SecondRealOnly,
            (false, false) => Verdict::NeitherReal,
            (true, true) => Verdict::BothAppearReal,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::FirstRealOnly => "Image 1 is Real. Image 2 is Fake.",
            Verdict::SecondRealOnly => "Image 2 is Real. Image 1 is Fake.",
            Verdict::NeitherReal => "Neither image is authentic.",
            Verdict::BothAppearReal => "Both images may be real (valid secrets found).",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Both single verifications and the verdict derived from them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub first: Verification,
    pub second: Verification,
    pub verdict: Verdict,
}

/// Decides whether images carry a secret that was issued through the registry.
///
/// ## Example of usage
/// ```rust
/// use pixelproof_core::registry::MemoryRegistry;
/// use pixelproof_core::Verifier;
///
/// let verifier = Verifier::new(MemoryRegistry::new());
///
/// // bytes that are not an image at all are simply not authentic
/// let verification = verifier.verify(b"definitely not a png").unwrap();
/// assert!(!verification.is_real);
/// assert_eq!(verification.secret, None);
/// ```
pub struct Verifier<R> {
    registry: R,
}

impl<R> Verifier<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}

impl<R: SecretRegistry> Verifier<R> {
    /// Recovers the hidden payload and looks it up byte for byte in the registry.
    ///
    /// Undecodable images and carriers without a payload are a regular "not authentic"
    /// outcome and never an error. Only a failing registry is reported as `Err`.
    pub fn verify(&self, image_bytes: &[u8]) -> Result<Verification> {
        let buffer = match decode(image_bytes) {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("Image cannot be verified: {e}");
                return Ok(Verification::not_authentic());
            }
        };

        let secret = match extract(&buffer) {
            Ok(secret) => secret,
            Err(e) => {
                debug!("No payload recovered: {e}");
                return Ok(Verification::not_authentic());
            }
        };

        if secret.is_empty() {
            return Ok(Verification {
                secret: Some(secret),
                is_real: false,
            });
        }

        let is_real = self.registry.find_by_secret(&secret)?.is_some();
        debug!("Recovered payload of {} bytes, registered: {is_real}", secret.len());

        Ok(Verification {
            secret: Some(secret),
            is_real,
        })
    }

    /// Verifies both images independently and classifies the pair.
    pub fn compare(&self, first: &[u8], second: &[u8]) -> Result<Comparison> {
        let first = self.verify(first)?;
        let second = self.verify(second)?;
        let verdict = Verdict::classify(first.is_real, second.is_real);

        Ok(Comparison {
            first,
            second,
            verdict,
        })
    }
}

impl<R: SecretRegistry + DetectionLog> Verifier<R> {
    /// Like `compare`, and records the verdict in the detection log.
    pub fn compare_and_log(
        &self,
        first_name: &str,
        first: &[u8],
        second_name: &str,
        second: &[u8],
    ) -> Result<Comparison> {
        let comparison = self.compare(first, second)?;
        self.registry.append(DetectionLogEntry::new(
            first_name,
            second_name,
            comparison.verdict.message(),
        ))?;

        Ok(comparison)
    }
}
