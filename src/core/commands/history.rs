use super::{Command, CommandError};
use crate::core::{dict::Entry, SessionState};

#[derive(Clone, Copy, Debug, Default)]
pub struct HistoryCommand;

impl HistoryCommand {
    fn format_entry(entry: &Entry) -> String {
        format!("{:>5}  {}", entry.ordinal, entry.text)
    }

    fn show<'a>(entries: impl Iterator<Item = &'a Entry>) {
        for entry in entries {
            println!("{}", Self::format_entry(entry));
        }
    }

    fn parse_number(arg: &str) -> Result<usize, CommandError> {
        arg.parse()
            .map_err(|_| CommandError::InvalidArguments(format!("{}: numeric argument required", arg)))
    }
}

impl Command for HistoryCommand {
    fn execute(&self, state: &mut SessionState, args: &[String]) -> Result<i32, CommandError> {
        match args.first().map(String::as_str) {
            None => Self::show(state.history.iter()),
            Some("-c") => state.history.clear(),
            Some("-d") => {
                let ordinal = args
                    .get(1)
                    .ok_or_else(|| CommandError::InvalidArguments("-d: option requires an argument".into()))
                    .and_then(|arg| Self::parse_number(arg))?;
                state.history.delete(ordinal)?;
            }
            Some(count) => {
                let count = Self::parse_number(count)?;
                Self::show(state.history.recent(count));
            }
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{commands::tests::args, state::tests::test_state};

    fn texts(state: &SessionState) -> Vec<String> {
        state.history.iter().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn test_format_entry() {
        let entry = Entry {
            ordinal: 12,
            text: "ls -l".into(),
        };
        assert_eq!(HistoryCommand::format_entry(&entry), "   12  ls -l");
    }

    #[test]
    fn test_list_delete_and_clear() {
        let mut state = test_state();
        for line in ["ls", "pwd", "env"] {
            state.history.add(line).unwrap();
        }
        assert_eq!(HistoryCommand.execute(&mut state, &[]).unwrap(), 0);
        assert_eq!(HistoryCommand.execute(&mut state, &args(&["2"])).unwrap(), 0);

        HistoryCommand.execute(&mut state, &args(&["-d", "1"])).unwrap();
        assert_eq!(texts(&state), vec!["ls", "env"]);

        assert!(HistoryCommand.execute(&mut state, &args(&["-d", "1"])).is_err());
        assert!(HistoryCommand.execute(&mut state, &args(&["-d"])).is_err());
        assert!(HistoryCommand.execute(&mut state, &args(&["many"])).is_err());

        HistoryCommand.execute(&mut state, &args(&["-c"])).unwrap();
        assert!(state.history.is_empty());
    }
}
