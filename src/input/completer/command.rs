use std::{collections::BTreeSet, fs};

use rustyline::completion::Pair;

use crate::core::commands::Builtin;

/// Candidates for the first word of a chain segment.
#[derive(Clone, Default)]
pub struct CommandCompleter {
    commands: BTreeSet<String>,
    aliases: BTreeSet<String>,
    scanned_path: Option<String>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        let mut completer = Self::default();
        completer.refresh_commands(None);
        completer
    }

    /// Rescans the search path. Nothing happens if `search_path` is the one
    /// scanned last time.
    pub fn refresh_commands(&mut self, search_path: Option<&str>) {
        if !self.commands.is_empty() && self.scanned_path.as_deref() == search_path {
            return;
        }
        self.commands.clear();
        self.commands
            .extend(Builtin::all().map(|builtin| builtin.name().to_string()));
        if let Some(search_path) = search_path {
            self.add_path_commands(search_path);
        }
        self.scanned_path = search_path.map(str::to_string);
    }

    fn add_path_commands(&mut self, search_path: &str) {
        for dir in search_path.split(':').filter(|dir| !dir.is_empty()) {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let is_file = entry
                    .file_type()
                    .map(|t| t.is_file() || t.is_symlink())
                    .unwrap_or(false);
                if !is_file {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    self.commands.insert(name.to_string());
                }
            }
        }
    }

    pub fn update_aliases(&mut self, aliases: impl IntoIterator<Item = String>) {
        self.aliases = aliases.into_iter().collect();
    }

    pub fn complete_command(&self, input: &str) -> Vec<Pair> {
        let mut matches = Vec::new();
        self.add_command_matches(&mut matches, input);
        self.add_alias_matches(&mut matches, input);
        matches
    }

    fn add_command_matches(&self, matches: &mut Vec<Pair>, input: &str) {
        for cmd in self.commands.range(input.to_string()..) {
            if !cmd.starts_with(input) {
                break;
            }
            matches.push(Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            });
        }
    }

    fn add_alias_matches(&self, matches: &mut Vec<Pair>, input: &str) {
        for alias in self.aliases.iter().filter(|a| a.starts_with(input)) {
            matches.push(Pair {
                display: format!("{} (alias)", alias),
                replacement: format!("{} ", alias),
            });
        }
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.commands.contains(word) || self.aliases.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_always_present() {
        let completer = CommandCompleter::new();
        let names: Vec<String> = completer
            .complete_command("unse")
            .into_iter()
            .map(|pair| pair.display)
            .collect();
        assert_eq!(names, vec!["unset", "unsetenv"]);
    }

    #[test]
    fn test_alias_candidates() {
        let mut completer = CommandCompleter::new();
        completer.update_aliases(vec!["hist5".to_string()]);
        let matches = completer.complete_command("hist");
        assert!(matches.iter().any(|p| p.display == "history"));
        assert!(matches.iter().any(|p| p.display == "hist5 (alias)"));
        assert!(completer.is_known("hist5"));
    }

    #[test]
    fn test_path_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("frobnicate"), "").unwrap();
        let mut completer = CommandCompleter::new();
        completer.refresh_commands(dir.path().to_str());
        assert!(completer.is_known("frobnicate"));
        assert_eq!(completer.complete_command("frob")[0].replacement, "frobnicate ");
    }
}
