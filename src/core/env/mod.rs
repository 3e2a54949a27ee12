mod vars;

pub use vars::EnvVarManager;

use crate::core::dict::DictError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("variable name cannot be empty")]
    EmptyName,
    #[error("invalid variable name: {0}")]
    InvalidName(String),
    #[error("{0}")]
    Dict(#[from] DictError),
}
