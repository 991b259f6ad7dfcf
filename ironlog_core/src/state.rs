//! Locked, atomic JSON files.
//!
//! Shared by every small JSON document Ironlog keeps on disk (catalog,
//! active session, settings). Reads take a shared lock; writes go through a
//! temp file in the same directory that is renamed over the original.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read and parse a JSON file under a shared lock
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(serde_json::from_str(&contents)?))
}

/// Atomically write a value as JSON
///
/// 1. Write to a temp file next to `path` under an exclusive lock
/// 2. Sync to disk
/// 3. Rename over the original
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Run a read-modify-write cycle while holding an exclusive lock on
/// `<path>.lock`
///
/// The document itself is replaced by rename on every save, so the lock
/// lives in a sidecar file that stays put.
pub fn with_exclusive_lock<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let lock_path = lock_path(path);
    if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    lock.lock_exclusive()?;

    let result = f();
    lock.unlock()?;
    result
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}
