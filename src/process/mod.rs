use nix::errno::Errno;
use thiserror::Error;

pub mod executor;
pub mod signal;

pub use executor::ProcessExecutor;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("argument contains an interior NUL byte: {0:?}")]
    NulByte(String),
    #[error("fork failed: {0}")]
    Fork(Errno),
    #[error("wait failed: {0}")]
    Wait(Errno),
    #[error("signal setup failed: {0}")]
    Signal(String),
}

impl ProcessError {
    /// Failures the session cannot continue after.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Fork(Errno::ENOMEM))
    }

    pub fn errno(&self) -> Option<Errno> {
        match self {
            ProcessError::Fork(errno) | ProcessError::Wait(errno) => Some(*errno),
            _ => None,
        }
    }
}
