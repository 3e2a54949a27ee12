use super::{Command, CommandError};
use crate::core::SessionState;

#[derive(Clone, Copy, Debug, Default)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        let code = match args.first() {
            None => state.status,
            Some(arg) => arg
                .parse::<i32>()
                .ok()
                .filter(|code| *code >= 0)
                .ok_or_else(|| CommandError::IllegalNumber(arg.clone()))?,
        };
        state.request_exit(code);
        Ok(code)
    }
}
