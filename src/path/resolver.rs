use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::core::commands::{Builtin, CommandError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Builtin(Builtin),
    External(PathBuf),
}

/// Decides whether a command name is a builtin or an executable file.
#[derive(Debug, Clone, Copy)]
pub struct CommandResolver<'a> {
    search_path: Option<&'a str>,
}

impl<'a> CommandResolver<'a> {
    /// `search_path` is the value of `PATH`, if set.
    pub fn new(search_path: Option<&'a str>) -> Self {
        Self { search_path }
    }

    pub fn resolve(&self, name: &str) -> Result<Resolution, CommandError> {
        if let Some(builtin) = Builtin::lookup(name) {
            return Ok(Resolution::Builtin(builtin));
        }

        if name.contains('/') {
            return Self::check_literal(Path::new(name)).map(Resolution::External);
        }

        let found = self.search(name).ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        debug!(command = name, path = %found.display(), "resolved on PATH");
        Ok(Resolution::External(found))
    }

    /// First executable `dir/name` in `PATH` order. An empty element
    /// stands for the current directory.
    fn search(&self, name: &str) -> Option<PathBuf> {
        self.search_path?
            .split(':')
            .map(|dir| {
                if dir.is_empty() {
                    PathBuf::from(name)
                } else {
                    Path::new(dir).join(name)
                }
            })
            .find(|candidate| is_executable(candidate))
    }

    fn check_literal(path: &Path) -> Result<PathBuf, CommandError> {
        match fs::metadata(path) {
            Err(_) => Err(CommandError::NotFound(path.display().to_string())),
            Ok(_) if is_executable(path) => Ok(path.to_path_buf()),
            Ok(_) => Err(CommandError::NotExecutable(path.display().to_string())),
        }
    }
}

/// Regular file with at least one execute bit set.
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
