//! File-backed consent slot.
//!
//! `JsonFileSlot` persists the consent record in a single file on disk,
//! one file per slot. The slot stores the record string verbatim; it does
//! not parse or validate it — that is the store's job, so a malformed file
//! surfaces as a `MalformedRecord` error from `load_states`, not here.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::slot::ConsentSlot;

/// A consent slot backed by a file on disk.
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    /// Creates a slot at `path`. The file is not created until the first
    /// write; a missing file reads as "no consent yet".
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ConsentSlot for JsonFileSlot {
    fn read(&self) -> Result<Option<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).context(format!("reading consent file {:?}", self.path))
            }
        };

        if contents.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(contents))
        }
    }

    fn write(&self, value: &str) -> Result<()> {
        fs::write(&self.path, value)
            .context(format!("writing consent file {:?}", self.path))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context(format!("removing consent file {:?}", self.path)),
        }
    }

    fn available(&self) -> bool {
        // Usable as long as the target directory exists; the file itself is
        // created lazily.
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }
}
