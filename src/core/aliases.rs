use std::borrow::Cow;

use super::dict::{DictError, Dictionary, Entry};

#[derive(Debug, Default, Clone)]
pub struct AliasManager {
    aliases: Dictionary,
}

impl AliasManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, command: &str) -> Result<(), DictError> {
        self.aliases.set_pair(name, command)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove_key(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.value_of(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.aliases.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.iter().map(|entry| entry.key().to_string()).collect()
    }

    /// Replaces the leading word of `command` with its alias value, keeping
    /// the rest of the text byte for byte. Only one level is expanded.
    pub fn expand_command<'a>(&self, command: &'a str) -> Cow<'a, str> {
        let trimmed = command.trim_start();
        let word_len = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let word = &trimmed[..word_len];
        if word.is_empty() {
            return Cow::Borrowed(command);
        }

        match self.get(word) {
            Some(value) => Cow::Owned(format!("{}{}", value, &trimmed[word_len..])),
            None => Cow::Borrowed(command),
        }
    }
}

/// `name='value'` as printed by the `alias` builtin.
pub fn format_alias(entry: &Entry) -> String {
    format!("{}='{}'", entry.key(), entry.value().unwrap_or_default())
}
