//! Best-score ("record") storage
//!
//! The game reads the record once at start-up and writes it back whenever
//! the score beats it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host-side persistence collaborator
pub trait RecordStore {
    /// Stored record, 0 when nothing has been saved yet
    fn load(&mut self) -> u64;
    fn save(&mut self, record: u64) -> Result<(), RecordError>;
}

/// Keeps the record in memory only
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryRecordStore {
    pub record: u64,
}

impl RecordStore for MemoryRecordStore {
    fn load(&mut self) -> u64 {
        self.record
    }

    fn save(&mut self, record: u64) -> Result<(), RecordError> {
        self.record = record;
        Ok(())
    }
}

/// On-disk format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct RecordFile {
    record: u64,
}

/// Stores the record as a small JSON document
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    path: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u64, RecordError> {
        let json = fs::read_to_string(&self.path).map_err(|source| RecordError::Io {
            path: self.path.clone(),
            source,
        })?;
        let file: RecordFile = serde_json::from_str(&json)?;
        Ok(file.record)
    }
}

impl RecordStore for JsonFileRecordStore {
    fn load(&mut self) -> u64 {
        match self.read() {
            Ok(record) => {
                log::info!("Loaded record {record} from {:?}", self.path);
                record
            }
            Err(err) => {
                log::info!("No record found ({err}), starting fresh");
                0
            }
        }
    }

    fn save(&mut self, record: u64) -> Result<(), RecordError> {
        let json = serde_json::to_string(&RecordFile { record })?;
        fs::write(&self.path, json).map_err(|source| RecordError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Record {record} saved");
        Ok(())
    }
}
