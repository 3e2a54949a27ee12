use super::EnvError;
use crate::core::dict::{Dictionary, Entry};

/// The shell's private copy of the environment.
///
/// Child processes see only what [`EnvVarManager::materialize`] returns; the
/// process-wide environment is never mutated.
#[derive(Clone, Debug, Default)]
pub struct EnvVarManager {
    vars: Dictionary,
    snapshot: Vec<String>,
    changed: bool,
}

impl EnvVarManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut manager = Self::new();
        for (key, value) in pairs {
            manager.set(key.as_ref(), value.as_ref())?;
        }
        Ok(manager)
    }

    /// Seeds from the inherited process environment, skipping entries that
    /// are not valid UTF-8.
    pub fn from_process() -> Result<Self, EnvError> {
        Self::from_pairs(std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        validate_name(name)?;
        self.vars.set_pair(name, value)?;
        self.changed = true;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.value_of(name)
    }

    pub fn unset(&mut self, name: &str) -> bool {
        let removed = self.vars.remove_key(name).is_some();
        self.changed |= removed;
        removed
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.vars.iter()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// `KEY=VALUE` strings for an exec call, rebuilt only when the
    /// dictionary changed since the previous call.
    pub fn materialize(&mut self) -> &[String] {
        if self.changed {
            self.snapshot = self.vars.to_vec();
            self.changed = false;
        }
        &self.snapshot
    }
}

fn validate_name(name: &str) -> Result<(), EnvError> {
    if name.is_empty() {
        return Err(EnvError::EmptyName);
    }
    if name.contains('=') || name.contains(char::is_whitespace) {
        return Err(EnvError::InvalidName(name.to_string()));
    }
    Ok(())
}
