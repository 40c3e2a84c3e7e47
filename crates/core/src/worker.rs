//! Worker process launching.
//!
//! The automation worker is a Python program living in its own project
//! tree with a venv. We invoke it with the target website, the staged
//! input file, and a mode flag, then hand its stdout/stderr to the
//! output pipeline. The worker communicates exclusively through its
//! output streams and exit code -- no structured IPC.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::{CoreError, CoreResult};
use crate::website::Website;

/// Locations of the automation runtime.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Python interpreter, normally the venv one inside the project root.
    pub python_bin: PathBuf,
    /// The worker's entry script.
    pub script: PathBuf,
    /// Automation project root; becomes the worker's cwd and `PYTHONPATH`.
    pub project_root: PathBuf,
}

/// What the worker does with its browser session once the flow finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Leave the browser open for manual follow-up work.
    HandOff,
    /// Close the session and exit when the flow completes.
    AutoClose,
}

/// A running worker process with stdout/stderr piped.
pub struct WorkerHandle {
    pub(crate) child: Child,
}

impl WorkerHandle {
    /// Wrap an already-spawned child. The child must have piped
    /// stdout/stderr for the pipeline to have anything to read.
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    /// OS process id, if the process is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

impl WorkerConfig {
    /// Build the worker's argument vector.
    ///
    /// Deterministic: `<script> --website <id> --test --input-file <path>`
    /// plus `--keep-open` in hand-off mode.
    pub fn args(&self, website: Website, input_file: &Path, mode: LaunchMode) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.script.clone().into_os_string(),
            "--website".into(),
            website.id().into(),
            "--test".into(),
            "--input-file".into(),
            input_file.as_os_str().to_os_string(),
        ];
        if mode == LaunchMode::HandOff {
            args.push("--keep-open".into());
        }
        args
    }
}

/// Spawn the worker for one job.
///
/// Fails fast with [`CoreError::Launch`] if the interpreter cannot be
/// spawned (missing binary, permissions); there is no such thing as an
/// empty handle.
///
/// `kill_on_drop` is left off on purpose: in hand-off mode the worker
/// (and its browser) must survive the HTTP request that started it,
/// including a client disconnect mid-stream.
pub fn launch(
    config: &WorkerConfig,
    website: Website,
    input_file: &Path,
    mode: LaunchMode,
) -> CoreResult<WorkerHandle> {
    let child = Command::new(&config.python_bin)
        .args(config.args(website, input_file, mode))
        .current_dir(&config.project_root)
        .env("PYTHONPATH", &config.project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| CoreError::Launch(e.to_string()))?;

    tracing::info!(
        website = website.id(),
        pid = child.id(),
        input_file = %input_file.display(),
        ?mode,
        "Launched automation worker"
    );

    Ok(WorkerHandle { child })
}
