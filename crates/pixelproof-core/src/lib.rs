//! # PixelProof Core API
//!
//! Hides issued secrets in the least significant bits of lossless images and
//! later decides whether an image carries one of them.
//!
//! - [`media`] turns image bytes into a flat RGB [`PixelBuffer`] and back (always PNG),
//!   and embeds or extracts a length-prefixed payload
//! - [`secret`] generates secrets from the operating system's CSPRNG
//! - [`registry`] stores issued secrets and the detection log
//! - [`Verifier`] recovers a payload and checks it against the registry
//! - [`api::embed`] ties it together: embed a secret and register it
//!
//! # Usage Examples
//!
//! ## Issue a secret and verify it
//!
//! ```rust
//! use std::io::Cursor;
//! use image::{ImageBuffer, Rgb, RgbImage};
//! use pixelproof_core::registry::MemoryRegistry;
//! use pixelproof_core::{SecretOptions, Verdict, Verifier};
//!
//! let carrier: RgbImage = ImageBuffer::from_fn(32, 32, |x, y| Rgb([x as u8 * 7 + 1, y as u8 * 5, 42]));
//! let mut png = Cursor::new(Vec::new());
//! carrier.write_to(&mut png, image::ImageFormat::Png).expect("Cannot write carrier");
//!
//! let registry = MemoryRegistry::new();
//! let embedded = pixelproof_core::api::embed::prepare()
//!     .with_image_bytes(png.get_ref().clone())
//!     .with_generated_secret(&SecretOptions::default())
//!     .with_filename("holiday")
//!     .execute(&registry)
//!     .expect("Failed to embed secret");
//!
//! let verifier = Verifier::new(&registry);
//! let comparison = verifier
//!     .compare(&embedded.image, png.get_ref())
//!     .expect("Registry is available");
//! assert_eq!(comparison.verdict, Verdict::FirstRealOnly);
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod error;
pub mod media;
pub mod registry;
pub mod result;
pub mod secret;
pub mod verifier;

pub use crate::error::PixelProofError;
pub use crate::media::PixelBuffer;
pub use crate::result::Result;
pub use crate::secret::{generate_secret, SecretOptions};
pub use crate::verifier::{Comparison, Verdict, Verification, Verifier};
