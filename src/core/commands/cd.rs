use std::env;

use super::{Command, CommandError};
use crate::{core::SessionState, path::PathExpander};

#[derive(Clone, Copy, Debug, Default)]
pub struct CdCommand;

impl Command for CdCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        let expander = PathExpander::new(state.env.get("HOME"));
        let arg = args.first().map(String::as_str);

        let target = match arg {
            None => expander
                .home_dir()
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?,
            Some("-") => {
                let old = state
                    .env
                    .get("OLDPWD")
                    .ok_or_else(|| CommandError::ExecutionError("OLDPWD not set".into()))?;
                println!("{}", old);
                old.into()
            }
            Some(dir) => expander
                .expand(dir)
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?,
        };

        let previous = env::current_dir().ok();
        env::set_current_dir(&target).map_err(|_| {
            CommandError::ExecutionError(format!(
                "can't cd to {}",
                arg.map_or_else(|| target.display().to_string(), str::to_string)
            ))
        })?;

        if let Some(previous) = previous {
            state.env.set("OLDPWD", &previous.to_string_lossy())?;
        }
        let current = env::current_dir()?;
        state.env.set("PWD", &current.to_string_lossy())?;
        Ok(0)
    }
}
