mod completer;
pub mod history;
mod reader;

pub use completer::ShellCompleter;
pub use history::History;
pub use reader::{
    strip_comment, InputKind, InteractiveSource, LineSource, ReadOutcome, StreamSource,
};
