//! Best-effort version-control access.
//!
//! Every query answers with a value or a failure sentinel (`None` / `false`).
//! Nothing here returns an error: a missing `git`, a repository-less
//! directory, a failing command and a timeout all look the same to callers,
//! who fall back to filesystem-only information.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Version-control capability used by numbering, creation and lookup.
pub trait VcsGateway {
    /// True when a usable repository was detected.
    fn is_available(&self) -> bool;

    /// Refresh knowledge of remote branches. False on any failure.
    #[must_use]
    fn fetch_all(&self) -> bool;

    /// Local and remote branch names as the tool reports them, selection
    /// markers and remote prefixes included.
    #[must_use]
    fn list_branches(&self) -> Option<Vec<String>>;

    /// Name of the checked-out branch. `None` when detached or unavailable.
    #[must_use]
    fn current_branch(&self) -> Option<String>;

    /// Create and switch to `name`. False on any failure.
    #[must_use]
    fn create_branch(&self, name: &str) -> bool;
}

// ---------------------------------------------------------------------------
// GitGateway
// ---------------------------------------------------------------------------

/// `VcsGateway` backed by the `git` binary on `PATH`.
pub struct GitGateway {
    root: PathBuf,
    git: Option<PathBuf>,
    timeout: Duration,
}

impl GitGateway {
    /// Probe for `git` and a work tree at `root`. The result is cached for
    /// the lifetime of the gateway.
    pub fn detect(root: &Path, timeout: Duration) -> Self {
        let mut gateway = Self {
            root: root.to_path_buf(),
            git: which::which("git").ok(),
            timeout,
        };
        if gateway.git.is_none() {
            tracing::debug!("git not found on PATH");
            return gateway;
        }
        let inside = gateway
            .run(&["rev-parse", "--is-inside-work-tree"])
            .is_some_and(|out| out.trim() == "true");
        if !inside {
            tracing::debug!(root = %root.display(), "not a git work tree");
            gateway.git = None;
        }
        gateway
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        let git = self.git.as_ref()?;
        tracing::debug!(?args, "git");
        run_with_timeout(git, args, &self.root, self.timeout)
    }
}

impl VcsGateway for GitGateway {
    fn is_available(&self) -> bool {
        self.git.is_some()
    }

    fn fetch_all(&self) -> bool {
        self.run(&["fetch", "--all", "--prune", "--quiet"]).is_some()
    }

    fn list_branches(&self) -> Option<Vec<String>> {
        let out = self.run(&["branch", "-a"])?;
        Some(
            out.lines()
                .map(str::to_string)
                .filter(|l| !l.trim().is_empty())
                .collect(),
        )
    }

    fn current_branch(&self) -> Option<String> {
        let out = self.run(&["branch", "--show-current"])?;
        let name = out.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn create_branch(&self, name: &str) -> bool {
        self.run(&["checkout", "-q", "-b", name]).is_some()
    }
}

// ---------------------------------------------------------------------------
// Process execution
// ---------------------------------------------------------------------------

/// Run a command and return its stdout when it exits successfully before
/// `timeout`. Spawn failure, non-zero exit and timeout all yield `None`.
///
/// stdout is drained on its own thread so a chatty child cannot fill the
/// pipe and stall; the wait happens on a second thread so the caller can
/// `recv_timeout` instead of polling.
fn run_with_timeout(
    program: &Path,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let child_pid = child.id();
    let stdout_handle = child.stdout.take();
    let stdout_thread = std::thread::spawn(move || -> String {
        let mut buf = String::new();
        if let Some(mut r) = stdout_handle {
            let _ = r.read_to_string(&mut buf);
        }
        buf
    });

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });

    let status = match rx.recv_timeout(timeout) {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            tracing::debug!("git wait failed: {e}");
            return None;
        }
        Err(_) => {
            kill_process(child_pid);
            tracing::warn!(
                ?args,
                "git timed out after {}s; continuing without it",
                timeout.as_secs()
            );
            return None;
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    if status.success() {
        Some(stdout)
    } else {
        None
    }
}

/// Best-effort SIGKILL by PID; errors are ignored.
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------
