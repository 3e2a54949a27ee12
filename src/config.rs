use std::path::PathBuf;

use crate::{
    core::env::EnvVarManager,
    error::ShellError,
    flags::Flags,
    input::{history::DEFAULT_HISTORY_MAX, InputKind},
    path::PathExpander,
};

const HISTORY_FILE_NAME: &str = ".atrium_history";
const RC_FILE_NAME: &str = ".atriumrc";

/// Settings resolved once at startup from flags and the inherited
/// environment.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub input: InputKind,
    /// Text given with `--command`.
    pub command: Option<String>,
    pub history_file: Option<PathBuf>,
    pub history_max: usize,
    pub rc_file: Option<PathBuf>,
    pub quiet: bool,
    pub debug: bool,
}

impl ShellConfig {
    pub fn resolve(
        flags: &Flags,
        env: &EnvVarManager,
        stdin_is_terminal: bool,
    ) -> Result<Self, ShellError> {
        let expander = PathExpander::new(env.get("HOME"));
        let home = expander.home_dir().ok();

        let command = flags.get_value("command").cloned();
        let input = match (&command, flags.script()) {
            (Some(_), _) => InputKind::Command,
            (None, Some(script)) => InputKind::Script(expander.expand(script)?),
            (None, None) if stdin_is_terminal => InputKind::Terminal,
            (None, None) => InputKind::Stdin,
        };

        let history_file = match env.get("HISTFILE").filter(|f| !f.is_empty()) {
            Some(file) => Some(expander.expand(file)?),
            None => home.as_ref().map(|home| home.join(HISTORY_FILE_NAME)),
        };
        let history_max = env
            .get("HISTSIZE")
            .and_then(|size| size.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_HISTORY_MAX);

        let rc_file = if flags.is_set("norc") {
            None
        } else if let Some(file) = flags.get_value("rcfile") {
            Some(expander.expand(file)?)
        } else if input == InputKind::Terminal {
            home.as_ref().map(|home| home.join(RC_FILE_NAME))
        } else {
            None
        };

        Ok(Self {
            input,
            command,
            history_file,
            history_max,
            rc_file,
            quiet: flags.is_set("quiet"),
            debug: flags.is_set("debug"),
        })
    }

    pub fn is_interactive(&self) -> bool {
        self.input == InputKind::Terminal
    }
}
