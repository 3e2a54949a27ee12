mod file_ops;

use std::path::{Path, PathBuf};

use thiserror::Error;

use self::file_ops::FileOps;
use crate::core::dict::{DictError, Dictionary, Entry};

pub const DEFAULT_HISTORY_MAX: usize = 4096;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("no history entry {0}")]
    NoSuchEntry(usize),
    #[error("{0}")]
    Dict(#[from] DictError),
}

/// Command history with a fixed capacity.
///
/// Every entry gets the next ordinal from a counter that only moves forward,
/// so ordinals stay unique for the life of the process even across
/// eviction, deletion and `clear`.
#[derive(Debug)]
pub struct History {
    entries: Dictionary,
    file_ops: Option<FileOps>,
    max_entries: usize,
    next_ordinal: usize,
    modified: bool,
}

impl History {
    pub fn new(history_file: Option<PathBuf>, max_entries: usize) -> Self {
        Self {
            entries: Dictionary::new(),
            file_ops: history_file.map(FileOps::new),
            max_entries: max_entries.max(1),
            next_ordinal: 0,
            modified: false,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_ops.as_ref().map(FileOps::path)
    }

    /// Stops reading and writing the history file for this session.
    pub fn detach_file(&mut self) {
        self.file_ops = None;
    }

    /// Pre-populates from the history file. Returns the number of entries
    /// loaded.
    pub fn load(&mut self) -> Result<usize, HistoryError> {
        let Some(file_ops) = &self.file_ops else {
            return Ok(0);
        };
        let lines = file_ops.load_entries(self.max_entries)?;
        let count = lines.len();
        for line in lines {
            self.push(line)?;
        }
        Ok(count)
    }

    /// Appends `line`, evicting from the oldest end once over capacity.
    /// Blank lines are not recorded.
    pub fn add(&mut self, line: &str) -> Result<bool, HistoryError> {
        if line.trim().is_empty() {
            return Ok(false);
        }
        self.push(line.to_string())?;
        self.modified = true;
        Ok(true)
    }

    fn push(&mut self, line: String) -> Result<(), HistoryError> {
        self.entries.push_back(line, self.next_ordinal)?;
        self.next_ordinal += 1;
        while self.entries.len() > self.max_entries {
            self.entries.remove_at(0);
        }
        Ok(())
    }

    pub fn delete(&mut self, ordinal: usize) -> Result<(), HistoryError> {
        let (index, _) = self
            .entries
            .find_ordinal(ordinal)
            .ok_or(HistoryError::NoSuchEntry(ordinal))?;
        self.entries.remove_at(index);
        self.modified = true;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.modified = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter()
    }

    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Entry> + '_ {
        self.iter().skip(self.len().saturating_sub(count))
    }

    /// Writes the file if anything changed since it was loaded.
    pub fn save(&mut self) -> Result<bool, HistoryError> {
        let Some(file_ops) = &self.file_ops else {
            return Ok(false);
        };
        if !self.modified {
            return Ok(false);
        }
        file_ops.write_entries(self.entries.iter().map(|entry| entry.text.as_str()))?;
        self.modified = false;
        Ok(true)
    }
}
