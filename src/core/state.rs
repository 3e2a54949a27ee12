use std::{fmt::Display, path::PathBuf};

use super::{aliases::AliasManager, env::EnvVarManager};
use crate::{
    input::{history::History, InputKind},
    process::ProcessExecutor,
    shell::chain::ChainOperator,
};

/// Everything that outlives a single input line. One instance exists per
/// process and is handed by reference to every builtin.
#[derive(Debug)]
pub struct SessionState {
    /// Raw text of the line being run.
    pub line: String,
    pub argv: Vec<String>,
    /// Executable resolved for the current segment, if external.
    pub path: Option<PathBuf>,
    pub line_count: usize,
    /// Exit code used when the session dies on a fatal error.
    pub err_num: i32,
    pub interactive: bool,
    pub quiet: bool,
    pub shell_name: String,
    pub env: EnvVarManager,
    pub aliases: AliasManager,
    pub history: History,
    pub status: i32,
    pub chain_op: ChainOperator,
    pub input: InputKind,
    pub source_depth: usize,
    pub executor: ProcessExecutor,
    exit_request: Option<i32>,
}

impl SessionState {
    pub fn new(shell_name: impl Into<String>, env: EnvVarManager, history: History) -> Self {
        let shell_name = shell_name.into();
        Self {
            line: String::new(),
            argv: Vec::new(),
            path: None,
            line_count: 0,
            err_num: 0,
            interactive: false,
            quiet: false,
            executor: ProcessExecutor::new(shell_name.clone()),
            shell_name,
            env,
            aliases: AliasManager::new(),
            history,
            status: 0,
            chain_op: ChainOperator::None,
            input: InputKind::Stdin,
            source_depth: 0,
            exit_request: None,
        }
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn histcount(&self) -> usize {
        self.history.len()
    }

    pub fn pid(&self) -> u32 {
        std::process::id()
    }

    /// Writes `<shell>: <line>: <command>: <message>` to stderr.
    pub fn report(&self, command: &str, message: impl Display) {
        if command.is_empty() {
            eprintln!("{}: {}: {}", self.shell_name, self.line_count, message);
        } else {
            eprintln!(
                "{}: {}: {}: {}",
                self.shell_name, self.line_count, command, message
            );
        }
    }

    pub fn request_exit(&mut self, code: i32) {
        self.exit_request = Some(code);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_request.is_some()
    }

    /// Code the process should exit with: an explicit `exit N`, otherwise
    /// the last status.
    pub fn exit_code(&self) -> i32 {
        self.exit_request.unwrap_or(self.status)
    }
}
