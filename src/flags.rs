use crate::error::ShellError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: HashMap<String, Flag>,
    order: Vec<String>,
    script: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: String,
    pub long: String,
    pub description: String,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = Flags {
            flags: HashMap::new(),
            order: Vec::new(),
            script: None,
        };

        flags.define("help", "-h", "--help", "Print this help message", false);
        flags.define("version", "-v", "--version", "Show version information", false);
        flags.define("command", "-c", "--command", "Run COMMAND and exit", true);
        flags.define("rcfile", "-r", "--rcfile", "Read startup commands from FILE", true);
        flags.define("norc", "-n", "--norc", "Skip the startup file", false);
        flags.define("quiet", "-q", "--quiet", "Suppress informational output", false);
        flags.define("debug", "-d", "--debug", "Enable debug logging", false);

        flags
    }

    fn define(&mut self, name: &str, short: &str, long: &str, description: &str, takes_value: bool) {
        self.flags.insert(
            name.to_string(),
            Flag {
                short: short.to_string(),
                long: long.to_string(),
                description: description.to_string(),
                takes_value,
                value: None,
            },
        );
        self.order.push(name.to_string());
    }

    /// Parses `args` (without the program name). The first argument that is
    /// not a flag names a script file.
    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if !arg.starts_with('-') {
                if self.script.is_some() {
                    return Err(ShellError::FlagError(format!(
                        "unexpected argument {}",
                        arg
                    )));
                }
                self.script = Some(arg.clone());
                continue;
            }

            let flag = self
                .flags
                .values_mut()
                .find(|flag| arg == &flag.short || arg == &flag.long)
                .ok_or_else(|| ShellError::FlagError(format!("unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = args.next().ok_or_else(|| {
                    ShellError::FlagError(format!("Flag {} requires a value", arg))
                })?;
                flag.value = Some(value.clone());
            } else {
                flag.value = Some("true".to_string());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn print_help(&self) {
        println!("Usage: atrium [OPTIONS] [SCRIPT]");
        println!("\nOptions:");
        for flag in self.order.iter().filter_map(|name| self.flags.get(name)) {
            let long = if flag.takes_value {
                format!("{} ARG", flag.long)
            } else {
                flag.long.clone()
            };
            println!("  {}, {:<15} {}", flag.short, long, flag.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<Flags, ShellError> {
        let mut flags = Flags::new();
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        flags.parse(&args)?;
        Ok(flags)
    }

    #[test]
    fn test_boolean_flags() {
        let flags = parse(&["-q", "--debug"]).unwrap();
        assert!(flags.is_set("quiet"));
        assert!(flags.is_set("debug"));
        assert!(!flags.is_set("help"));
        assert_eq!(flags.script(), None);
    }

    #[test]
    fn test_value_flags() {
        let flags = parse(&["-c", "ls; pwd", "--rcfile", "/tmp/rc"]).unwrap();
        assert_eq!(flags.get_value("command").map(String::as_str), Some("ls; pwd"));
        assert_eq!(flags.get_value("rcfile").map(String::as_str), Some("/tmp/rc"));
        assert!(matches!(parse(&["-c"]), Err(ShellError::FlagError(_))));
    }

    #[test]
    fn test_script_argument() {
        let flags = parse(&["-n", "run.sh"]).unwrap();
        assert_eq!(flags.script(), Some("run.sh"));
        assert!(flags.is_set("norc"));
        assert!(parse(&["a.sh", "b.sh"]).is_err());
    }

    #[test]
    fn test_unknown_flag() {
        assert!(matches!(parse(&["--bogus"]), Err(ShellError::FlagError(_))));
    }
}
