//! # Secret registry and detection log
//!
//! The registry remembers every issued secret together with the image it was
//! embedded into, the detection log keeps the verdict of every two-image
//! comparison. Both are append-only: records are never mutated or deleted.
//!
//! Implementations own their consistency. The codec never holds a lock while
//! talking to them, so they have to accept concurrent lookups and inserts
//! through `&self`.

mod file;
mod memory;

pub use file::FileRegistry;
pub use memory::MemoryRegistry;

use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::Result;

const MASKED_SECRET: &str = "********";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An issued secret and the image it was hidden in
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub filename: String,
    #[serde(with = "base64_bytes")]
    pub secret: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl SecretRecord {
    pub fn new(filename: impl Into<String>, secret: impl Into<Vec<u8>>, image: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            secret: secret.into(),
            image,
            created_at: Utc::now(),
        }
    }
}

// the secret is a credential, it must not end up in logs
impl Debug for SecretRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("filename", &self.filename)
            .field("secret", &MASKED_SECRET)
            .field("image", &format_args!("{} bytes", self.image.len()))
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Display for SecretRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File: {} | Secret: {} | {}",
            self.filename,
            MASKED_SECRET,
            self.created_at.format(TIMESTAMP_FORMAT)
        )
    }
}

/// The verdict of one two-image comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionLogEntry {
    pub first_image: String,
    pub second_image: String,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

impl DetectionLogEntry {
    pub fn new(
        first_image: impl Into<String>,
        second_image: impl Into<String>,
        verdict: impl Into<String>,
    ) -> Self {
        Self {
            first_image: first_image.into(),
            second_image: second_image.into(),
            verdict: verdict.into(),
            created_at: Utc::now(),
        }
    }
}

impl Display for DetectionLogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image 1: {} | Image 2: {} | {} | Result: {}",
            self.first_image,
            self.second_image,
            self.created_at.format(TIMESTAMP_FORMAT),
            self.verdict
        )
    }
}

/// Store of issued secrets, looked up by exact byte equality
pub trait SecretRegistry {
    /// Stores a new record, fails with `DuplicateSecret` if the secret was issued before.
    fn insert(&self, record: SecretRecord) -> Result<()>;

    fn find_by_secret(&self, secret: &[u8]) -> Result<Option<SecretRecord>>;

    /// all records, newest first
    fn recent_records(&self) -> Result<Vec<SecretRecord>>;
}

/// Append-only log of two-image comparisons
pub trait DetectionLog {
    fn append(&self, entry: DetectionLogEntry) -> Result<()>;

    /// all entries, newest first
    fn list_recent(&self) -> Result<Vec<DetectionLogEntry>>;
}

impl<T: SecretRegistry + ?Sized> SecretRegistry for &T {
    fn insert(&self, record: SecretRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn find_by_secret(&self, secret: &[u8]) -> Result<Option<SecretRecord>> {
        (**self).find_by_secret(secret)
    }

    fn recent_records(&self) -> Result<Vec<SecretRecord>> {
        (**self).recent_records()
    }
}

impl<T: SecretRegistry + ?Sized> SecretRegistry for Arc<T> {
    fn insert(&self, record: SecretRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn find_by_secret(&self, secret: &[u8]) -> Result<Option<SecretRecord>> {
        (**self).find_by_secret(secret)
    }

    fn recent_records(&self) -> Result<Vec<SecretRecord>> {
        (**self).recent_records()
    }
}

impl<T: DetectionLog + ?Sized> DetectionLog for &T {
    fn append(&self, entry: DetectionLogEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn list_recent(&self) -> Result<Vec<DetectionLogEntry>> {
        (**self).list_recent()
    }
}

impl<T: DetectionLog + ?Sized> DetectionLog for Arc<T> {
    fn append(&self, entry: DetectionLogEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn list_recent(&self) -> Result<Vec<DetectionLogEntry>> {
        (**self).list_recent()
    }
}

/// newest first, among equal timestamps the later insert comes first
pub(crate) fn newest_first<T, F>(items: &[T], created_at: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
