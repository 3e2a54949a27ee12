use super::{strip_quotes, Command, CommandError};
use crate::core::SessionState;

#[derive(Clone, Copy, Debug, Default)]
pub struct EnvCommand;

impl Command for EnvCommand {
    fn execute(&self, state: &mut SessionState, _args: &[String]) -> Result<i32, CommandError> {
        for entry in state.env.iter() {
            println!("{}", entry.text);
        }
        Ok(0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SetenvCommand;

impl Command for SetenvCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        let [name, value] = args else {
            return Err(CommandError::InvalidArguments(
                "Incorrect number of arguments".into(),
            ));
        };
        state.env.set(name, value)?;
        Ok(0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnsetenvCommand;

impl Command for UnsetenvCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments("Too few arguments".into()));
        }
        for name in args {
            state.env.unset(name);
        }
        Ok(0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ExportCommand;

impl ExportCommand {
    fn parse_export(arg: &str) -> Result<(&str, &str), CommandError> {
        let (name, value) = arg.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments("Export syntax: export NAME=VALUE".into())
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::InvalidArguments(
                "Variable name cannot be empty".into(),
            ));
        }
        Ok((name, strip_quotes(value.trim())))
    }
}

impl Command for ExportCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        if args.is_empty() {
            for entry in state.env.iter() {
                println!(
                    "export {}=\"{}\"",
                    entry.key(),
                    entry.value().unwrap_or_default()
                );
            }
            return Ok(0);
        }

        for arg in args {
            let (name, value) = Self::parse_export(arg)?;
            state.env.set(name, value)?;
        }
        Ok(0)
    }
}
