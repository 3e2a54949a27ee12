use std::{
    ffi::{CString, OsStr},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr,
};

use nix::{
    errno::Errno,
    sys::wait::{waitpid, WaitStatus},
    unistd::{fork, ForkResult, Pid},
};
use tracing::debug;

use super::{signal, ProcessError};

pub const STATUS_NOT_EXECUTABLE: i32 = 126;
pub const STATUS_NOT_FOUND: i32 = 127;
const SIGNAL_STATUS_BASE: i32 = 128;

#[derive(Clone, Debug)]
pub struct ProcessExecutor {
    shell_name: String,
}

/// Everything the child needs, allocated before `fork` so the child only
/// performs async-signal-safe calls.
struct ExecImage {
    path: CString,
    _args: Vec<CString>,
    _env: Vec<CString>,
    argv: Vec<*const libc::c_char>,
    envp: Vec<*const libc::c_char>,
    diagnostic: Vec<u8>,
}

impl ExecImage {
    fn new(
        path: &Path,
        args: &[String],
        env: &[String],
        diagnostic: String,
    ) -> Result<Self, ProcessError> {
        let path = to_cstring(path.as_os_str())?;
        let args = args
            .iter()
            .map(|arg| to_cstring(OsStr::new(arg)))
            .collect::<Result<Vec<_>, _>>()?;
        let env = env
            .iter()
            .map(|var| to_cstring(OsStr::new(var)))
            .collect::<Result<Vec<_>, _>>()?;

        let argv = null_terminated(&args);
        let envp = null_terminated(&env);
        Ok(Self {
            path,
            _args: args,
            _env: env,
            argv,
            envp,
            diagnostic: diagnostic.into_bytes(),
        })
    }

    /// Replaces the process image. Only returns by exiting.
    fn exec(&self) -> ! {
        signal::reset_child_signals();
        // SAFETY: every pointer refers to a NUL-terminated string owned by
        // `self`, and both arrays end with a null pointer.
        unsafe {
            libc::execve(self.path.as_ptr(), self.argv.as_ptr(), self.envp.as_ptr());
        }

        let code = match Errno::last() {
            Errno::ENOENT => STATUS_NOT_FOUND,
            _ => STATUS_NOT_EXECUTABLE,
        };
        // SAFETY: write(2) and _exit(2) are async-signal-safe.
        unsafe {
            libc::write(
                libc::STDERR_FILENO,
                self.diagnostic.as_ptr().cast(),
                self.diagnostic.len(),
            );
            libc::_exit(code)
        }
    }
}

fn to_cstring(value: &OsStr) -> Result<CString, ProcessError> {
    CString::new(value.as_bytes())
        .map_err(|_| ProcessError::NulByte(value.to_string_lossy().into_owned()))
}

fn null_terminated(strings: &[CString]) -> Vec<*const libc::c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect()
}

impl ProcessExecutor {
    pub fn new(shell_name: impl Into<String>) -> Self {
        Self {
            shell_name: shell_name.into(),
        }
    }

    /// Forks, execs `path` with `args` (including `argv[0]`) and `env`, and
    /// blocks until the child terminates. Returns its exit status, encoded
    /// as `128 + signal` when it was killed by a signal.
    pub fn spawn_process(
        &self,
        path: &Path,
        args: &[String],
        env: &[String],
    ) -> Result<i32, ProcessError> {
        let diagnostic = format!(
            "{}: {}: cannot execute\n",
            self.shell_name,
            path.display()
        );
        let image = ExecImage::new(path, args, env, diagnostic)?;

        // SAFETY: the child only calls async-signal-safe functions before
        // execve or _exit.
        match unsafe { fork() }.map_err(ProcessError::Fork)? {
            ForkResult::Child => image.exec(),
            ForkResult::Parent { child } => {
                debug!(pid = child.as_raw(), path = %path.display(), "spawned child");
                wait_for(child)
            }
        }
    }
}

fn wait_for(child: Pid) -> Result<i32, ProcessError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!(pid = child.as_raw(), code, "child exited");
                return Ok(code);
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                debug!(pid = child.as_raw(), signal = %sig, "child killed by signal");
                return Ok(SIGNAL_STATUS_BASE + sig as i32);
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ProcessError::Wait(errno)),
        }
    }
}
