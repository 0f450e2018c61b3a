//! Snapshot files
//!
//! Layout: one header line `RABBITRY_SNAPSHOT v1 crc32=<hex>` followed by
//! the JSON body. The checksum covers the body bytes only. Saving writes a
//! sibling temp file and renames it over the target, so a crash mid-save
//! leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StoreError, StoreResult};
use super::StoredRecord;

const MAGIC: &str = "RABBITRY_SNAPSHOT v1";

/// Committed state at one commit point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub commit: u64,
    pub records: Vec<StoredRecord>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            commit: 0,
            records: Vec::new(),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes a snapshot to `path`, replacing any previous file.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    let body = serde_json::to_vec(snapshot)?;
    let mut contents = format!("{} crc32={:08x}\n", MAGIC, compute_checksum(&body)).into_bytes();
    contents.extend_from_slice(&body);

    let tmp = temp_path(path);
    fs::write(&tmp, &contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads and verifies a snapshot file.
pub fn load_snapshot(path: &Path) -> StoreResult<Snapshot> {
    let contents = fs::read(path)?;
    let newline = contents
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| StoreError::Corrupt("missing header line".into()))?;
    let header = std::str::from_utf8(&contents[..newline])
        .map_err(|_| StoreError::Corrupt("header is not UTF-8".into()))?;
    let body = &contents[newline + 1..];

    let hex = header
        .strip_prefix(MAGIC)
        .and_then(|rest| rest.trim().strip_prefix("crc32="))
        .ok_or_else(|| StoreError::Corrupt(format!("unrecognized header '{}'", header)))?;
    let expected = u32::from_str_radix(hex, 16)
        .map_err(|_| StoreError::Corrupt(format!("bad checksum field '{}'", hex)))?;

    if !verify_checksum(body, expected) {
        return Err(StoreError::Corrupt("checksum mismatch".into()));
    }

    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cage, Entity};
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        Snapshot {
            commit: 1,
            records: vec![StoredRecord {
                version: 1,
                record: Cage::new("A1", 2).into_record(),
            }],
        }
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("farm.snapshot");
        let snapshot = sample();
        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_tampered_body_refused() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("farm.snapshot");
        save_snapshot(&path, &sample()).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 2;
        bytes[last] = b' ';
        fs::write(&path, bytes).unwrap();

        assert!(matches!(load_snapshot(&path), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_foreign_file_refused() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        fs::write(&path, "shopping list\nhay, pellets\n").unwrap();
        assert!(matches!(load_snapshot(&path), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.snapshot");
        assert!(matches!(load_snapshot(&path), Err(StoreError::Io(_))));
    }
}
