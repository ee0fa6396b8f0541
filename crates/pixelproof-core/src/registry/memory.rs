use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use super::{newest_first, DetectionLog, DetectionLogEntry, SecretRecord, SecretRegistry};
use crate::error::PixelProofError;
use crate::result::Result;

/// Process local registry and detection log, mostly useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: RwLock<Vec<SecretRecord>>,
    entries: RwLock<Vec<DetectionLogEntry>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| PixelProofError::RegistryUnavailable("registry lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| PixelProofError::RegistryUnavailable("registry lock poisoned".to_string()))
}

impl SecretRegistry for MemoryRegistry {
    fn insert(&self, record: SecretRecord) -> Result<()> {
        let mut records = write(&self.records)?;
        if records.iter().any(|r| r.secret == record.secret) {
            return Err(PixelProofError::DuplicateSecret);
        }
        debug!("Registering secret for {}", record.filename);
        records.push(record);

        Ok(())
    }

    fn find_by_secret(&self, secret: &[u8]) -> Result<Option<SecretRecord>> {
        Ok(read(&self.records)?
            .iter()
            .find(|r| r.secret == secret)
            .cloned())
    }

    fn recent_records(&self) -> Result<Vec<SecretRecord>> {
        Ok(newest_first(&read(&self.records)?, |r| r.created_at))
    }
}

impl DetectionLog for MemoryRegistry {
    fn append(&self, entry: DetectionLogEntry) -> Result<()> {
        write(&self.entries)?.push(entry);
        Ok(())
    }

    fn list_recent(&self) -> Result<Vec<DetectionLogEntry>> {
        Ok(newest_first(&read(&self.entries)?, |e| e.created_at))
    }
}
