use std::{borrow::Cow, collections::VecDeque};

use tracing::{debug, trace};

use super::{
    chain::{self, ChainOperator, ChainSplitter},
    expand::expand_variables,
};
use crate::{
    core::{commands::CommandError, SessionState},
    path::{CommandResolver, Resolution},
};

/// How many times substitution may feed a segment back to the splitter.
pub const MAX_ALIAS_DEPTH: usize = 10;

/// A segment waiting to run.
#[derive(Debug)]
struct Pending {
    operator: ChainOperator,
    text: String,
    /// Number of re-splits this text came out of.
    depth: usize,
    /// Set once variables have been substituted, so values are not scanned
    /// twice.
    substituted: bool,
}

/// Runs every segment of `line` against the session.
///
/// Recoverable failures are reported and recorded in `state.status`. Only
/// errors the session cannot survive are returned; `state.err_num` holds
/// the code to exit with.
pub fn run_line(state: &mut SessionState, line: &str) -> Result<(), CommandError> {
    state.line = line.to_string();

    let segments: Vec<_> = ChainSplitter::new(line).collect();
    if let Err(err) = chain::validate(&segments) {
        let err = CommandError::Syntax(err.to_string());
        state.report("", &err);
        state.status = err.status();
        return Ok(());
    }

    let mut queue: VecDeque<Pending> = segments
        .into_iter()
        .map(|segment| Pending {
            operator: segment.operator,
            text: segment.text.to_string(),
            depth: 0,
            substituted: false,
        })
        .collect();

    while let Some(pending) = queue.pop_front() {
        if state.exit_requested() {
            break;
        }
        if !pending.operator.permits(state.status) {
            trace!(operator = %pending.operator, text = %pending.text, "segment skipped");
            continue;
        }
        state.chain_op = pending.operator;

        if let Err(err) = run_segment(state, pending, &mut queue) {
            // Fatal errors are reported once, by whoever ends the process.
            if let Some(errno) = err.fatal_errno() {
                state.err_num = errno;
                return Err(err);
            }
            state.report(failed_command(state, &err), &err);
            state.status = err.status();
        }
    }
    Ok(())
}

fn failed_command<'a>(state: &'a SessionState, err: &'a CommandError) -> &'a str {
    match err {
        CommandError::NotFound(name) | CommandError::NotExecutable(name) => name,
        CommandError::Syntax(_) | CommandError::AliasLoop(_) => "",
        _ => state.argv.first().map_or("", String::as_str),
    }
}

fn run_segment(
    state: &mut SessionState,
    pending: Pending,
    queue: &mut VecDeque<Pending>,
) -> Result<(), CommandError> {
    state.argv.clear();
    state.path = None;

    let text = if pending.substituted {
        Cow::Borrowed(pending.text.as_str())
    } else {
        expand_variables(&pending.text, state)
    };
    let aliased = match state.aliases.expand_command(&text) {
        Cow::Owned(aliased) => Some(aliased),
        Cow::Borrowed(_) => None,
    };
    let text = aliased.map_or(text, Cow::Owned);

    if chain::contains_operator(&text) {
        debug!(text = %text, depth = pending.depth + 1, "substitution re-split");
        return requeue(&text, pending.depth, queue);
    }

    let argv: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() {
        return Ok(());
    }
    state.argv = argv;
    dispatch(state)
}

/// Feeds substituted text back through the splitter. The first piece
/// inherits the decision already taken for the segment it replaces.
fn requeue(text: &str, depth: usize, queue: &mut VecDeque<Pending>) -> Result<(), CommandError> {
    if depth >= MAX_ALIAS_DEPTH {
        // Drop everything this segment's expansions produced.
        while queue.front().is_some_and(|next| next.depth > 0) {
            queue.pop_front();
        }
        let word = text.split_whitespace().next().unwrap_or_default();
        return Err(CommandError::AliasLoop(word.to_string()));
    }

    let segments: Vec<_> = ChainSplitter::new(text).collect();
    chain::validate(&segments).map_err(|err| CommandError::Syntax(err.to_string()))?;

    for segment in segments.into_iter().rev() {
        queue.push_front(Pending {
            operator: segment.operator,
            text: segment.text.to_string(),
            depth: depth + 1,
            substituted: true,
        });
    }
    Ok(())
}

fn dispatch(state: &mut SessionState) -> Result<(), CommandError> {
    let Some(name) = state.argv.first() else {
        return Ok(());
    };
    let resolution = CommandResolver::new(state.env.get("PATH")).resolve(name)?;
    debug!(argv = ?state.argv, resolution = ?resolution, "dispatching");

    let status = match resolution {
        Resolution::Builtin(builtin) => {
            let args = state.argv[1..].to_vec();
            builtin.run(state, &args)?
        }
        Resolution::External(path) => {
            let status = state
                .executor
                .spawn_process(&path, &state.argv, state.env.materialize())?;
            state.path = Some(path);
            status
        }
    };
    state.status = status;
    Ok(())
}
