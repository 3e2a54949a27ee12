use std::path::PathBuf;

use crate::error::ShellError;

/// Tilde expansion against the shell's own `HOME`, falling back to the
/// account's home directory when `HOME` is unset.
#[derive(Clone, Debug, Default)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl PathExpander {
    pub fn new(home: Option<&str>) -> Self {
        Self {
            home: home.filter(|h| !h.is_empty()).map(PathBuf::from),
        }
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, ShellError> {
        match path.strip_prefix('~') {
            Some("") => self.home_dir(),
            Some(rest) if rest.starts_with('/') => {
                let mut home = self.home_dir()?;
                home.extend(rest.split('/').filter(|part| !part.is_empty()));
                Ok(home)
            }
            // "~user" is left alone
            _ => Ok(PathBuf::from(path)),
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf, ShellError> {
        self.home
            .clone()
            .or_else(dirs::home_dir)
            .ok_or(ShellError::HomeDirNotFound)
    }
}
