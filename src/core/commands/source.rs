use std::fs;

use super::{Command, CommandError};
use crate::{core::SessionState, input::strip_comment, path::PathExpander, shell::controller};

const MAX_SOURCE_DEPTH: usize = 32;

#[derive(Clone, Copy, Debug, Default)]
pub struct SourceCommand;

impl Command for SourceCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        let Some(file) = args.first() else {
            return Err(CommandError::InvalidArguments(
                "Source command requires a file path".to_string(),
            ));
        };
        if state.source_depth >= MAX_SOURCE_DEPTH {
            return Err(CommandError::ExecutionError(format!(
                "{}: maximum nesting depth exceeded",
                file
            )));
        }

        let path = PathExpander::new(state.env.get("HOME"))
            .expand(file)
            .map_err(|e| CommandError::ExecutionError(e.to_string()))?;
        let content = fs::read_to_string(&path)
            .map_err(|_| CommandError::ExecutionError(format!("can't open {}", file)))?;

        let outer_line = std::mem::take(&mut state.line);
        state.source_depth += 1;
        let result = run_lines(state, &content);
        state.source_depth -= 1;
        state.line = outer_line;
        result?;
        Ok(state.status)
    }
}

fn run_lines(state: &mut SessionState, content: &str) -> Result<(), CommandError> {
    for line in content.lines() {
        if state.exit_requested() {
            break;
        }
        controller::run_line(state, strip_comment(line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{commands::tests::args, state::tests::test_state};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn script(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_runs_each_line() {
        let file = script("# comment\nsetenv A 1\nalias ll=ls -l # trailing\n\nsetenv B $A\n");
        let mut state = test_state();
        let path = file.path().display().to_string();
        assert_eq!(SourceCommand.execute(&mut state, &args(&[&path])).unwrap(), 0);
        assert_eq!(state.env.get("A"), Some("1"));
        assert_eq!(state.env.get("B"), Some("1"));
        assert_eq!(state.aliases.get("ll"), Some("ls -l"));
    }

    #[test]
    fn test_source_keeps_outer_line() {
        let file = script("setenv A 1\nsetenv B 2\n");
        let mut state = test_state();
        let path = file.path().display().to_string();
        let line = format!("source {} && setenv C 3", path);
        controller::run_line(&mut state, &line).unwrap();
        assert_eq!(state.line, line);
        assert_eq!(state.env.get("B"), Some("2"));
        assert_eq!(state.env.get("C"), Some("3"));
    }

    #[test]
    fn test_source_returns_last_status() {
        let file = script("unalias ghost\n");
        let mut state = test_state();
        let path = file.path().display().to_string();
        assert_eq!(SourceCommand.execute(&mut state, &args(&[&path])).unwrap(), 1);
    }

    #[test]
    fn test_source_stops_at_exit() {
        let file = script("setenv A 1\nexit 3\nsetenv B 2\n");
        let mut state = test_state();
        let path = file.path().display().to_string();
        SourceCommand.execute(&mut state, &args(&[&path])).unwrap();
        assert_eq!(state.exit_code(), 3);
        assert_eq!(state.env.get("B"), None);
    }

    #[test]
    fn test_source_self_inclusion_is_bounded() {
        let mut file = NamedTempFile::new().unwrap();
        let path = file.path().display().to_string();
        writeln!(file, "source {}", path).unwrap();
        let mut state = test_state();
        assert_eq!(SourceCommand.execute(&mut state, &args(&[&path])).unwrap(), 1);
        assert_eq!(state.source_depth, 0);
    }

    #[test]
    fn test_source_invalid_file_and_args() {
        let mut state = test_state();
        assert!(SourceCommand
            .execute(&mut state, &args(&["/nonexistent/file"]))
            .is_err());
        assert!(matches!(
            SourceCommand.execute(&mut state, &[]),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
