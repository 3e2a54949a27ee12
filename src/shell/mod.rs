pub mod chain;
pub mod controller;
pub mod expand;

use std::{
    env,
    fs::File,
    io::{self, BufReader, Cursor, IsTerminal},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tracing::{debug, info, warn};

use crate::{
    config::ShellConfig,
    core::{commands::Builtin, commands::CommandError, env::EnvVarManager, SessionState},
    error::ShellError,
    flags::Flags,
    input::{
        strip_comment, History, InputKind, InteractiveSource, LineSource, ReadOutcome,
        StreamSource,
    },
    process::signal,
};

/// Exit code when the script named on the command line cannot be opened.
const STATUS_CANNOT_OPEN: i32 = 127;

pub struct Shell {
    state: SessionState,
    source: Box<dyn LineSource>,
    rc_file: Option<PathBuf>,
    /// Raised by the SIGINT handler in interactive sessions.
    interrupted: Option<Arc<AtomicBool>>,
}

impl Shell {
    pub fn new(flags: &Flags, shell_name: impl Into<String>) -> Result<Self, ShellError> {
        let env = EnvVarManager::from_process()?;
        let config = ShellConfig::resolve(flags, &env, io::stdin().is_terminal())?;
        debug!(?config, "resolved configuration");

        let mut history = History::new(config.history_file.clone(), config.history_max);
        match history.load() {
            Ok(count) => debug!(count, "history loaded"),
            Err(err) => {
                let err = CommandError::from(err);
                if err.fatal_errno().is_some() {
                    return Err(err.into());
                }
                warn!("couldn't load history, not saving it this session: {}", err);
                history.detach_file();
            }
        }

        let mut state = SessionState::new(shell_name, env, history);
        state.interactive = config.is_interactive();
        state.quiet = config.quiet;
        state.input = config.input.clone();

        let source = open_source(&config)?;
        let interrupted = if state.interactive {
            Some(signal::setup_interactive_handlers()?)
        } else {
            None
        };

        let mut shell = Self::from_parts(state, source, config.rc_file);
        shell.interrupted = interrupted;
        Ok(shell)
    }

    /// Assembles a shell around an existing session and line source.
    pub fn from_parts(
        state: SessionState,
        source: Box<dyn LineSource>,
        rc_file: Option<PathBuf>,
    ) -> Self {
        let mut source = source;
        for entry in state.history.iter() {
            source.remember(&entry.text);
        }
        Self {
            state,
            source,
            rc_file,
            interrupted: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Reads and runs lines until end of input or `exit`. Returns the code
    /// the process should exit with. History is persisted on every path
    /// out, fatal errors included.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        info!(
            shell = %self.state.shell_name,
            interactive = self.state.interactive,
            "session started"
        );
        let result = self.source_rc_file().and_then(|()| self.read_loop());
        self.shutdown();
        result.map(|()| self.state.exit_code())
    }

    fn read_loop(&mut self) -> Result<(), ShellError> {
        while !self.state.exit_requested() {
            if self.take_interrupt() {
                println!();
            }
            self.source.sync(&self.state);

            let prompt = self.prompt();
            let line = match self.source.read_line(&prompt)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    if self.state.interactive && !self.state.quiet {
                        println!();
                    }
                    break;
                }
            };

            self.state.line_count += 1;
            self.record(&line)?;
            controller::run_line(&mut self.state, strip_comment(&line))?;
        }
        Ok(())
    }

    fn take_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.swap(false, Ordering::SeqCst))
    }

    fn prompt(&self) -> String {
        if !self.state.interactive {
            return String::new();
        }
        let cwd = env::current_dir()
            .map(|dir| dir.display().to_string())
            .ok()
            .or_else(|| self.state.env.get("PWD").map(str::to_string))
            .unwrap_or_default();
        format!("{} $ ", cwd)
    }

    fn record(&mut self, line: &str) -> Result<(), ShellError> {
        let added = self.state.history.add(line).map_err(CommandError::from)?;
        if added {
            self.source.remember(line);
        }
        Ok(())
    }

    fn source_rc_file(&mut self) -> Result<(), ShellError> {
        let Some(rc_file) = self.rc_file.clone() else {
            return Ok(());
        };
        if !rc_file.exists() {
            debug!(path = %rc_file.display(), "no startup file");
            return Ok(());
        }

        let args = [rc_file.display().to_string()];
        match Builtin::Source.run(&mut self.state, &args) {
            Ok(status) => {
                debug!(path = %rc_file.display(), status, "startup file sourced");
                Ok(())
            }
            Err(err) if err.fatal_errno().is_some() => Err(err.into()),
            Err(err) => {
                warn!(path = %rc_file.display(), "startup file failed: {}", err);
                self.state.report("source", &err);
                Ok(())
            }
        }
    }

    fn shutdown(&mut self) {
        match self.state.history.save() {
            Ok(true) => debug!("history saved"),
            Ok(false) => {}
            Err(err) => warn!("couldn't save history: {}", err),
        }
        info!(code = self.state.exit_code(), "session ended");
    }
}

fn open_source(config: &ShellConfig) -> Result<Box<dyn LineSource>, ShellError> {
    let source: Box<dyn LineSource> = match &config.input {
        InputKind::Terminal => Box::new(InteractiveSource::new()?),
        InputKind::Script(path) => {
            let file = File::open(path).map_err(|e| ShellError::Fatal {
                err_num: STATUS_CANNOT_OPEN,
                message: format!("cannot open {}: {}", path.display(), e),
            })?;
            Box::new(StreamSource::new(BufReader::new(file)))
        }
        InputKind::Stdin => Box::new(StreamSource::new(io::stdin().lock())),
        InputKind::Command => Box::new(StreamSource::new(Cursor::new(
            config.command.clone().unwrap_or_default(),
        ))),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::tests::test_state;
    use std::{collections::VecDeque, fs, io::ErrorKind};

    /// Replays fixed read results, then fails or reports end of input.
    struct ScriptedSource {
        steps: VecDeque<ReadOutcome>,
        fail_at_end: bool,
    }

    impl ScriptedSource {
        fn new(steps: Vec<ReadOutcome>, fail_at_end: bool) -> Self {
            Self {
                steps: steps.into(),
                fail_at_end,
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
            match self.steps.pop_front() {
                Some(outcome) => Ok(outcome),
                None if self.fail_at_end => {
                    Err(io::Error::new(ErrorKind::Other, "terminal went away").into())
                }
                None => Ok(ReadOutcome::Eof),
            }
        }
    }

    fn line(text: &str) -> ReadOutcome {
        ReadOutcome::Line(text.to_string())
    }

    fn shell_for(input: &str) -> Shell {
        let source = StreamSource::new(Cursor::new(input.to_string()));
        Shell::from_parts(test_state(), Box::new(source), None)
    }

    #[test]
    fn test_runs_until_eof() {
        let mut shell = shell_for("setenv A 1\n\n# comment only\nfalse\n");
        assert_eq!(shell.run().unwrap(), 1);
        assert_eq!(shell.state().env.get("A"), Some("1"));
        assert_eq!(shell.state().line_count, 4);
        // Blank lines are not recorded.
        assert_eq!(shell.state().history.len(), 3);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_session() {
        let source = StreamSource::new(Cursor::new(b"setenv A 1\n\xff\nsetenv B 2\n".to_vec()));
        let mut shell = Shell::from_parts(test_state(), Box::new(source), None);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().env.get("A"), Some("1"));
        assert_eq!(shell.state().env.get("B"), Some("2"));
        assert_eq!(shell.state().line_count, 3);
    }

    #[test]
    fn test_interrupt_discards_line_and_keeps_status() {
        let source = ScriptedSource::new(
            vec![line("false"), ReadOutcome::Interrupted, line("setenv S $?")],
            false,
        );
        let mut shell = Shell::from_parts(test_state(), Box::new(source), None);
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().env.get("S"), Some("1"));
        assert_eq!(shell.state().line_count, 2);
        assert_eq!(shell.state().history.len(), 2);
    }

    #[test]
    fn test_history_is_saved_when_session_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("history");
        let mut state = test_state();
        state.history = History::new(Some(file.clone()), 10);

        let source = ScriptedSource::new(vec![line("true")], true);
        let mut shell = Shell::from_parts(state, Box::new(source), None);
        assert!(shell.run().is_err());
        assert_eq!(fs::read_to_string(file).unwrap(), "true\n");
    }

    #[test]
    fn test_exit_ends_the_loop() {
        let mut shell = shell_for("exit 3\nsetenv A 1\n");
        assert_eq!(shell.run().unwrap(), 3);
        assert_eq!(shell.state().env.get("A"), None);
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let mut shell = shell_for("setenv A 1 # setenv B 2\n");
        shell.run().unwrap();
        assert_eq!(shell.state().env.get("B"), None);
        assert_eq!(shell.state().history.iter().next().unwrap().text, "setenv A 1 # setenv B 2");
    }

    #[test]
    fn test_rc_file_runs_first() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join("rc");
        fs::write(&rc, "alias greet=setenv GREETING\n").unwrap();

        let source = StreamSource::new(Cursor::new("greet hello\n".to_string()));
        let mut shell = Shell::from_parts(test_state(), Box::new(source), Some(rc));
        assert_eq!(shell.run().unwrap(), 0);
        assert_eq!(shell.state().env.get("GREETING"), Some("hello"));
    }

    #[test]
    fn test_history_is_saved_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("history");
        let mut state = test_state();
        state.history = History::new(Some(file.clone()), 10);

        let source = StreamSource::new(Cursor::new("true\ntrue && false\n".to_string()));
        let mut shell = Shell::from_parts(state, Box::new(source), None);
        assert_eq!(shell.run().unwrap(), 1);
        assert_eq!(fs::read_to_string(file).unwrap(), "true\ntrue && false\n");
    }
}
