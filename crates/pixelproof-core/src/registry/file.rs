use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{newest_first, DetectionLog, DetectionLogEntry, SecretRecord, SecretRegistry};
use crate::error::PixelProofError;
use crate::result::Result;

const SECRETS_FILE: &str = "secrets.jsonl";
const DETECTIONS_FILE: &str = "detections.jsonl";

/// Registry persisted as two append-only JSON lines files inside one directory.
///
/// Lookups go through an in-memory index of `secret -> line offset` that is
/// extended with whatever was appended since the last call, so a lookup reads
/// the new lines plus the one matching record, never the whole file.
/// Each record is written with a single append, an unterminated last line is a
/// write still in progress and is skipped until it is complete.
///
/// A directory must have one writing `FileRegistry` at a time. Duplicate
/// secrets are rejected under a process-local mutex only, two writers on the
/// same directory can race each other. Any number of other instances may read.
#[derive(Debug)]
pub struct FileRegistry {
    secrets: PathBuf,
    detections: PathBuf,
    index: Mutex<SecretIndex>,
    detections_lock: Mutex<()>,
}

#[derive(Default)]
struct SecretIndex {
    /// bytes of the secrets file already indexed, always ends on a line boundary
    indexed_len: u64,
    offsets: HashMap<Vec<u8>, u64>,
}

// keys are secrets, only their count is printed
impl fmt::Debug for SecretIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretIndex")
            .field("indexed_len", &self.indexed_len)
            .field("secrets", &self.offsets.len())
            .finish()
    }
}

/// the part of a `SecretRecord` line the index needs, the image is skipped
#[derive(Deserialize)]
struct SecretKey {
    #[serde(with = "super::base64_bytes")]
    secret: Vec<u8>,
}

impl FileRegistry {
    /// opens the registry in `dir`, the directory is created if missing
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| unavailable(dir, e))?;

        Ok(Self {
            secrets: dir.join(SECRETS_FILE),
            detections: dir.join(DETECTIONS_FILE),
            index: Mutex::new(SecretIndex::default()),
            detections_lock: Mutex::new(()),
        })
    }

    /// Indexes the complete lines appended to the secrets file since the last refresh.
    fn refresh(&self, index: &mut SecretIndex) -> Result<()> {
        let path = self.secrets.as_path();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(unavailable(path, e)),
        };
        file.seek(SeekFrom::Start(index.indexed_len))
            .map_err(|e| unavailable(path, e))?;

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line).map_err(|e| unavailable(path, e))?;
            if read == 0 {
                break;
            }
            if !line.ends_with('\n') {
                warn!("Skipping unterminated line in {path:?}");
                break;
            }

            if !line.trim().is_empty() {
                let key: SecretKey = serde_json::from_str(&line)?;
                index.offsets.entry(key.secret).or_insert(index.indexed_len);
            }
            index.indexed_len += read as u64;
        }
        debug!("{} secrets indexed from {path:?}", index.offsets.len());

        Ok(())
    }

    fn record_at(&self, offset: u64) -> Result<SecretRecord> {
        let path = self.secrets.as_path();
        let mut file = File::open(path).map_err(|e| unavailable(path, e))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| unavailable(path, e))?;

        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(|e| unavailable(path, e))?;

        Ok(serde_json::from_str(&line)?)
    }

    fn append_line<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| unavailable(path, e))?;
        file.write_all(&line).map_err(|e| unavailable(path, e))?;
        file.flush().map_err(|e| unavailable(path, e))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| PixelProofError::RegistryUnavailable("registry lock poisoned".to_string()))
}

fn unavailable(path: &Path, e: std::io::Error) -> PixelProofError {
    error!("Registry file {path:?} is not accessible: {e}");
    PixelProofError::RegistryUnavailable(format!("{}: {e}", path.display()))
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(unavailable(path, e)),
    };

    let mut lines: Vec<&str> = content.split('\n').collect();
    // everything after the last newline is a write still in progress
    if let Some(unterminated) = lines.pop() {
        if !unterminated.is_empty() {
            warn!("Skipping unterminated line in {path:?}");
        }
    }

    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(PixelProofError::from))
        .collect()
}

impl SecretRegistry for FileRegistry {
    fn insert(&self, record: SecretRecord) -> Result<()> {
        let mut index = lock(&self.index)?;
        self.refresh(&mut index)?;
        if index.offsets.contains_key(&record.secret) {
            return Err(PixelProofError::DuplicateSecret);
        }

        debug!("Registering secret for {} in {:?}", record.filename, self.secrets);
        self.append_line(&self.secrets, &record)
    }

    fn find_by_secret(&self, secret: &[u8]) -> Result<Option<SecretRecord>> {
        let offset = {
            let mut index = lock(&self.index)?;
            self.refresh(&mut index)?;
            index.offsets.get(secret).copied()
        };

        offset.map(|offset| self.record_at(offset)).transpose()
    }

    fn recent_records(&self) -> Result<Vec<SecretRecord>> {
        let records: Vec<SecretRecord> = read_lines(&self.secrets)?;
        Ok(newest_first(&records, |r| r.created_at))
    }
}

impl DetectionLog for FileRegistry {
    fn append(&self, entry: DetectionLogEntry) -> Result<()> {
        let _guard = lock(&self.detections_lock)?;
        self.append_line(&self.detections, &entry)
    }

    fn list_recent(&self) -> Result<Vec<DetectionLogEntry>> {
        let entries: Vec<DetectionLogEntry> = read_lines(&self.detections)?;
        Ok(newest_first(&entries, |e| e.created_at))
    }
}
