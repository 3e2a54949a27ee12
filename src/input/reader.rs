use std::{
    io::{BufRead, ErrorKind},
    path::PathBuf,
};

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};

use super::ShellCompleter;
use crate::{core::SessionState, error::ShellError};

/// Where the session reads its lines from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Terminal,
    Script(PathBuf),
    Stdin,
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The read was cancelled by an interrupt; any partial line is gone.
    Interrupted,
    Eof,
}

pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;

    /// Refreshes anything derived from session state (completion tables).
    fn sync(&mut self, _state: &SessionState) {}

    /// Makes `line` available for recall, where the source supports it.
    fn remember(&mut self, _line: &str) {}
}

/// Cuts the line at a `#` that starts it or follows whitespace.
pub fn strip_comment(line: &str) -> &str {
    let mut previous = None;
    for (index, c) in line.char_indices() {
        if c == '#' && previous.map_or(true, char::is_whitespace) {
            return &line[..index];
        }
        previous = Some(c);
    }
    line
}

pub struct InteractiveSource {
    editor: Editor<ShellCompleter, FileHistory>,
}

impl InteractiveSource {
    pub fn new() -> Result<Self, ShellError> {
        let mut editor = Editor::<ShellCompleter, FileHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new()));
        editor.set_auto_add_history(false);
        Ok(Self { editor })
    }
}

impl LineSource for InteractiveSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn sync(&mut self, state: &SessionState) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.update(state);
        }
    }

    fn remember(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::warn!("couldn't add to editor history: {}", e);
        }
    }
}

/// Script files, piped standard input and `-c` strings.
pub struct StreamSource<R> {
    reader: R,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for StreamSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => {
                let mut line = String::from_utf8_lossy(&buf).into_owned();
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(ReadOutcome::Line(line))
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}
