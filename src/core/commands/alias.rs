use super::{strip_quotes, Command, CommandError};
use crate::core::{aliases::format_alias, SessionState};

#[derive(Clone, Copy, Debug, Default)]
pub struct AliasCommand;

impl Command for AliasCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        if args.is_empty() {
            for entry in state.aliases.iter() {
                println!("{}", format_alias(entry));
            }
            return Ok(0);
        }

        // Arguments were split on whitespace, so a definition takes the
        // rest of the line as its value.
        if args[0].contains('=') {
            let alias_str = args.join(" ");
            let Some((name, value)) = alias_str.split_once('=') else {
                return Err(CommandError::InvalidArguments(
                    "Usage: alias name='command'".to_string(),
                ));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "Usage: alias name='command'".to_string(),
                ));
            }

            let value = strip_quotes(value.trim());
            if value.is_empty() {
                state.aliases.remove(name);
            } else {
                state.aliases.add(name, value)?;
            }
            return Ok(0);
        }

        for name in args {
            let entry = state
                .aliases
                .iter()
                .find(|entry| entry.key() == name.as_str())
                .ok_or_else(|| CommandError::ExecutionError(format!("{} not found", name)))?;
            println!("{}", format_alias(entry));
        }
        Ok(0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnaliasCommand;

impl Command for UnaliasCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: unalias name [name ...]".to_string(),
            ));
        }

        let missing: Vec<&str> = args
            .iter()
            .filter(|name| !state.aliases.remove(name))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            Ok(0)
        } else {
            Err(CommandError::ExecutionError(format!(
                "{} not found",
                missing.join(", ")
            )))
        }
    }
}
