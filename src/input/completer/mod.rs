mod command;
mod path;

use std::borrow::Cow;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use self::{command::CommandCompleter, path::PathCompleter};
use crate::{core::SessionState, highlight::SyntaxHighlighter, shell::chain::operator_at};

#[derive(Clone)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl Default for ShellCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellCompleter {
    pub fn new() -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(),
            path_completer: PathCompleter::new(),
            highlighter: SyntaxHighlighter::new(),
        }
    }

    /// Pulls the search path, home directory and alias names from the
    /// session.
    pub fn update(&mut self, state: &SessionState) {
        self.command_completer
            .refresh_commands(state.env.get("PATH"));
        self.command_completer.update_aliases(state.aliases.names());
        self.path_completer.set_home(state.env.get("HOME"));
    }
}

/// Byte offset where the chain segment containing `end` starts.
fn segment_start(line: &str, end: usize) -> usize {
    let mut start = 0;
    let mut index = 0;
    while index < end {
        match operator_at(line, index) {
            Some(operator) => {
                index += operator.width();
                start = index.min(end);
            }
            None => index += 1,
        }
    }
    start
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let commands = &self.command_completer;
        Cow::Owned(
            self.highlighter
                .highlight_command(line, |word| commands.is_known(word)),
        )
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(self.highlighter.highlight_hint(hint))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let segment_offset = segment_start(line, pos);
        let segment = &line[segment_offset..pos];

        let word = segment.rsplit(char::is_whitespace).next().unwrap_or_default();
        let word_offset = segment.len() - word.len();
        let first_word = segment[..word_offset].trim().is_empty();

        let matches = if first_word && !word.contains('/') {
            self.command_completer.complete_command(word)
        } else {
            self.path_completer.complete_path(word)
        };

        Ok((segment_offset + word_offset, matches))
    }
}
