use super::{Builtin, Command, CommandError};
use crate::core::SessionState;

#[derive(Clone, Copy, Debug, Default)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn execute(&self, _state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        if args.is_empty() {
            println!("Builtin commands:");
            for builtin in Builtin::all() {
                println!("  {}", builtin.usage());
            }
            println!("\nCommands may be chained with ';', '&&' and '||'.");
            return Ok(0);
        }

        for topic in args {
            let builtin = Builtin::lookup(topic).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no help topics match '{}'", topic))
            })?;
            println!("{}", builtin.usage());
        }
        Ok(0)
    }
}
