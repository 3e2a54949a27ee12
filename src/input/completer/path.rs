use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

use crate::path::PathExpander;

/// Completes file system paths for argument words.
#[derive(Clone, Default)]
pub struct PathCompleter {
    home: Option<String>,
}

impl PathCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_home(&mut self, home: Option<&str>) {
        self.home = home.map(str::to_string);
    }

    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (typed_dir, file_prefix) = split_input(incomplete);
        let dir_to_search = self.search_dir(typed_dir);

        let Ok(entries) = fs::read_dir(&dir_to_search) else {
            return Vec::new();
        };
        let mut matches: Vec<Pair> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.starts_with(file_prefix) {
                    return None;
                }
                // Dotfiles only when asked for.
                if name.starts_with('.') && !file_prefix.starts_with('.') {
                    return None;
                }
                Some(completion_pair(typed_dir, &name, &entry.path()))
            })
            .collect();

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }

    fn search_dir(&self, typed_dir: &str) -> PathBuf {
        if typed_dir.is_empty() {
            return PathBuf::from(".");
        }
        PathExpander::new(self.home.as_deref())
            .expand(typed_dir)
            .unwrap_or_else(|_| PathBuf::from(typed_dir))
    }
}

/// Splits at the last `/` into the directory the user typed (slash kept)
/// and the partial file name.
fn split_input(incomplete: &str) -> (&str, &str) {
    match incomplete.rfind('/') {
        Some(index) => incomplete.split_at(index + 1),
        None => ("", incomplete),
    }
}

fn completion_pair(typed_dir: &str, name: &str, path: &Path) -> Pair {
    let text = format!("{}{}", typed_dir, name);
    if path.is_dir() {
        Pair {
            display: format!("{}/", name),
            replacement: format!("{}/", text),
        }
    } else {
        Pair {
            display: name.to_string(),
            replacement: format!("{} ", text),
        }
    }
}
