use thiserror::Error;

use crate::{
    core::{commands::CommandError, env::EnvError},
    input::history::HistoryError,
    process::ProcessError,
};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Flag error: {0}")]
    FlagError(String),
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("{message}")]
    Fatal { err_num: i32, message: String },
}

impl ShellError {
    /// Exit code for a session that ends on this error.
    pub fn err_num(&self) -> i32 {
        match self {
            ShellError::Fatal { err_num, .. } => *err_num,
            ShellError::FlagError(_) => 2,
            ShellError::Io(err) => err.raw_os_error().unwrap_or(1),
            _ => 1,
        }
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::Fatal {
            err_num: err.fatal_errno().unwrap_or_else(|| err.status()),
            message: err.to_string(),
        }
    }
}
