use atrium::error::ShellError;
use atrium::flags::Flags;
use atrium::logging;
use atrium::shell::Shell;
use std::{env, process};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("atrium: {}", err);
            err.err_num()
        }
    };
    process::exit(code);
}

fn run() -> Result<i32, ShellError> {
    let mut args = env::args();
    let shell_name = args.next().unwrap_or_else(|| "atrium".to_string());
    let args: Vec<String> = args.collect();

    let mut flags = Flags::new();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(0);
    }

    if flags.is_set("version") {
        println!("Atrium {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    logging::init(flags.is_set("debug"));

    let mut shell = Shell::new(&flags, shell_name)?;
    shell.run()
}
