use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use nix::sys::signal::{signal, SigHandler, Signal};
use signal_hook::consts::SIGQUIT;

use crate::process::ProcessError;

/// Keeps an interactive shell alive across SIGINT and SIGQUIT.
///
/// Handlers (rather than `SIG_IGN`) are installed so that `execve` resets
/// both signals to their default disposition in children. The returned flag
/// is raised whenever SIGINT arrives.
pub fn setup_interactive_handlers() -> Result<Arc<AtomicBool>, ProcessError> {
    let interrupted = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| ProcessError::Signal(e.to_string()))?;

    signal_hook::flag::register(SIGQUIT, Arc::new(AtomicBool::new(false)))
        .map_err(|e| ProcessError::Signal(e.to_string()))?;

    Ok(interrupted)
}

/// Restores default dispositions in a freshly forked child.
///
/// Only calls `sigaction`, so it is safe between `fork` and `execve`.
pub fn reset_child_signals() {
    for sig in [Signal::SIGINT, Signal::SIGQUIT] {
        // SAFETY: installing SIG_DFL does not run any Rust code in signal
        // context.
        let _ = unsafe { signal(sig, SigHandler::SigDfl) };
    }
}
