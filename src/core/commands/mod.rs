mod alias;
mod cd;
mod env;
mod exit;
mod help;
mod history;
mod source;

pub use alias::{AliasCommand, UnaliasCommand};
pub use cd::CdCommand;
pub use env::{EnvCommand, ExportCommand, SetenvCommand, UnsetenvCommand};
pub use exit::ExitCommand;
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use source::SourceCommand;

use thiserror::Error;

use super::{dict::DictError, env::EnvError, SessionState};
use crate::{
    input::history::HistoryError,
    process::{
        executor::{STATUS_NOT_EXECUTABLE, STATUS_NOT_FOUND},
        ProcessError,
    },
};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not found")]
    NotFound(String),
    #[error("Permission denied")]
    NotExecutable(String),
    #[error("alias nesting too deep (possible loop): {0}")]
    AliasLoop(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Illegal number: {0}")]
    IllegalNumber(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    ExecutionError(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("{0}")]
    History(#[from] HistoryError),
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("{0}")]
    Dict(#[from] DictError),
}

impl CommandError {
    /// Exit status recorded for `$?` when a segment fails with this error.
    pub fn status(&self) -> i32 {
        match self {
            CommandError::NotFound(_) => STATUS_NOT_FOUND,
            CommandError::NotExecutable(_) => STATUS_NOT_EXECUTABLE,
            CommandError::Syntax(_) | CommandError::IllegalNumber(_) => 2,
            _ => 1,
        }
    }

    /// The errno to terminate the session with, for errors it cannot
    /// survive.
    pub fn fatal_errno(&self) -> Option<i32> {
        let exhausted = matches!(
            self,
            CommandError::Dict(DictError::Exhausted)
                | CommandError::Env(EnvError::Dict(DictError::Exhausted))
                | CommandError::History(HistoryError::Dict(DictError::Exhausted))
        );
        if exhausted {
            return Some(libc::ENOMEM);
        }
        match self {
            CommandError::Process(err) if err.is_fatal() => err.errno().map(|e| e as i32),
            _ => None,
        }
    }
}

pub trait Command {
    /// Runs against the shared session and returns the new exit status.
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Env,
    Help,
    History,
    Setenv,
    Unsetenv,
    Cd,
    Alias,
    Unalias,
    Export,
    Unset,
    Source,
}

/// Lookup order for builtin names; the first match wins.
const BUILTINS: &[(&str, Builtin)] = &[
    ("exit", Builtin::Exit),
    ("env", Builtin::Env),
    ("help", Builtin::Help),
    ("history", Builtin::History),
    ("setenv", Builtin::Setenv),
    ("unsetenv", Builtin::Unsetenv),
    ("cd", Builtin::Cd),
    ("alias", Builtin::Alias),
    ("unalias", Builtin::Unalias),
    ("export", Builtin::Export),
    ("unset", Builtin::Unset),
    ("source", Builtin::Source),
];

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|&(_, builtin)| builtin)
    }

    pub fn all() -> impl Iterator<Item = Builtin> {
        BUILTINS.iter().map(|&(_, builtin)| builtin)
    }

    pub fn name(self) -> &'static str {
        BUILTINS
            .iter()
            .find(|&&(_, builtin)| builtin == self)
            .map_or("", |&(name, _)| name)
    }

    pub fn usage(self) -> &'static str {
        match self {
            Builtin::Exit => "exit [N]          leave the shell with status N (default: last status)",
            Builtin::Env => "env               print the environment",
            Builtin::Help => "help [NAME]       describe builtins",
            Builtin::History => "history [N | -c | -d ORDINAL]  list, clear or delete history entries",
            Builtin::Setenv => "setenv NAME VALUE set or overwrite an environment variable",
            Builtin::Unsetenv => "unsetenv NAME...  remove environment variables",
            Builtin::Cd => "cd [DIR | - | ~]  change the working directory",
            Builtin::Alias => "alias [NAME[=VALUE]]  define or print aliases",
            Builtin::Unalias => "unalias NAME...   remove aliases",
            Builtin::Export => "export [NAME=VALUE...]  set variables, or print them",
            Builtin::Unset => "unset NAME...     remove environment variables",
            Builtin::Source => "source FILE       run commands from FILE",
        }
    }

    pub fn run(self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        match self {
            Builtin::Exit => ExitCommand.execute(state, args),
            Builtin::Env => EnvCommand.execute(state, args),
            Builtin::Help => HelpCommand.execute(state, args),
            Builtin::History => HistoryCommand.execute(state, args),
            Builtin::Setenv => SetenvCommand.execute(state, args),
            Builtin::Unsetenv | Builtin::Unset => UnsetenvCommand.execute(state, args),
            Builtin::Cd => CdCommand.execute(state, args),
            Builtin::Alias => AliasCommand.execute(state, args),
            Builtin::Unalias => UnaliasCommand.execute(state, args),
            Builtin::Export => ExportCommand.execute(state, args),
            Builtin::Source => SourceCommand.execute(state, args),
        }
    }
}

/// Strips one pair of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::tests::test_state;

    pub(super) fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_command_detection() {
        assert_eq!(Builtin::lookup("cd"), Some(Builtin::Cd));
        assert_eq!(Builtin::lookup("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup("unsetenv"), Some(Builtin::Unsetenv));
        assert_eq!(Builtin::lookup("unknown"), None);
        assert_eq!(Builtin::lookup(""), None);
    }

    #[test]
    fn test_names_round_trip() {
        for builtin in Builtin::all() {
            assert_eq!(Builtin::lookup(builtin.name()), Some(builtin));
            assert!(!builtin.usage().is_empty());
        }
    }

    #[test]
    fn test_command_error_status() {
        assert_eq!(CommandError::NotFound("x".into()).status(), 127);
        assert_eq!(CommandError::NotExecutable("x".into()).status(), 126);
        assert_eq!(CommandError::Syntax("x".into()).status(), 2);
        assert_eq!(CommandError::IllegalNumber("x".into()).status(), 2);
        assert_eq!(CommandError::AliasLoop("x".into()).status(), 1);
        assert_eq!(CommandError::ExecutionError("x".into()).status(), 1);
    }

    #[test]
    fn test_fatal_errors() {
        assert_eq!(
            CommandError::Dict(DictError::Exhausted).fatal_errno(),
            Some(libc::ENOMEM)
        );
        assert_eq!(
            CommandError::Process(ProcessError::Fork(nix::errno::Errno::ENOMEM)).fatal_errno(),
            Some(libc::ENOMEM)
        );
        assert_eq!(
            CommandError::Process(ProcessError::Fork(nix::errno::Errno::EAGAIN)).fatal_errno(),
            None
        );
        assert_eq!(CommandError::NotFound("x".into()).fatal_errno(), None);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'ls -l'"), "ls -l");
        assert_eq!(strip_quotes("\"x\""), "x");
        assert_eq!(strip_quotes("'x\""), "'x\"");
        assert_eq!(strip_quotes("'"), "'");
    }

    #[test]
    fn test_run_dispatches_to_handler() {
        let mut state = test_state();
        let status = Builtin::Setenv
            .run(&mut state, &args(&["GREETING", "hi"]))
            .unwrap();
        assert_eq!(status, 0);
        assert_eq!(state.env.get("GREETING"), Some("hi"));

        Builtin::Unset.run(&mut state, &args(&["GREETING"])).unwrap();
        assert_eq!(state.env.get("GREETING"), None);
    }
}
