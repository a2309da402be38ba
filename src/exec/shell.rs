// src/exec/shell.rs

//! Shell command executor.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::dag::Task;
use crate::exec::backend::{ExecFuture, TaskExecutor};

/// Payload of a task that runs a shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub cmd: String,
    /// Working directory; inherits the current one when `None`.
    pub cwd: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: None,
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
}

/// Runs [`ShellCommand`] payloads via `sh -c` (`cmd /C` on Windows).
///
/// A non-zero exit status is reported as an execution error, which makes the
/// attempt eligible for retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl TaskExecutor<ShellCommand, CommandOutput> for ShellExecutor {
    fn execute(&self, task: &Task<ShellCommand>) -> ExecFuture<CommandOutput> {
        let name = task.id.clone();
        let command = task.payload.clone();
        Box::pin(async move { run_command(name, command).await })
    }
}

async fn run_command(name: String, command: ShellCommand) -> Result<CommandOutput> {
    info!(task = %name, cmd = %command.cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&command.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&command.cmd);
        c
    };

    if let Some(ref cwd) = command.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", name))?;

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let task_name = name.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let mut stdout = String::new();
    if let Some(mut out) = child.stdout.take() {
        out.read_to_string(&mut stdout)
            .await
            .with_context(|| format!("reading stdout of task '{}'", name))?;
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", name))?;

    let code = status.code().unwrap_or(-1);

    info!(
        task = %name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if !status.success() {
        bail!("command `{}` exited with code {}", command.cmd, code);
    }

    Ok(CommandOutput {
        exit_code: code,
        stdout,
    })
}
