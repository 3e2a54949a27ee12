use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use super::HistoryError;

#[derive(Debug, Clone)]
pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Reads at most the last `max_entries` non-blank lines. A missing file
    /// is an empty history.
    pub fn load_entries(&self, max_entries: usize) -> Result<Vec<String>, HistoryError> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::Io(self.file_path.clone(), e)),
        };

        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| HistoryError::Io(self.file_path.clone(), e))?;
            if read == 0 {
                break;
            }
            // Lines from other encodings are kept, not dropped.
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() {
                entries.push(line.to_string());
            }
        }

        let excess = entries.len().saturating_sub(max_entries);
        entries.drain(..excess);
        Ok(entries)
    }

    pub fn write_entries<'a>(
        &self,
        entries: impl Iterator<Item = &'a str>,
    ) -> Result<(), HistoryError> {
        let io_err = |e| HistoryError::Io(self.file_path.clone(), e);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.file_path)
            .map_err(io_err)?;

        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{}", entry).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)
    }
}
