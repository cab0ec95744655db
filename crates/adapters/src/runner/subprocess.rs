// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns a backend CLI with separated stdout/stderr and exposes its
//! stdout as a line stream.

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

/// A running backend subprocess. Stderr is forwarded to tracing as it
/// arrives rather than buffered, since backends are long-lived and a
/// buffered stderr pipe can deadlock if never drained.
pub struct SpawnedProcess {
    child: Child,
    stdout_lines: Lines<BufReader<ChildStdout>>,
}

impl SpawnedProcess {
    pub async fn next_line(&mut self) -> Option<String> {
        match self.stdout_lines.next_line().await {
            Ok(Some(line)) => Some(line),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "runner.subprocess.stdout_read_error");
                None
            }
        }
    }

    pub async fn wait(&mut self) -> Option<i32> {
        match self.child.wait().await {
            Ok(status) => status.code(),
            Err(e) => {
                tracing::warn!(error = %e, "runner.subprocess.wait_error");
                None
            }
        }
    }
}

/// Spawn `argv[0] argv[1..]` for `engine`, piping stdout for line-by-line
/// reads and stderr to inherit so operators can see crash output directly.
pub async fn spawn_backend_process(
    engine: &str,
    argv: &[String],
) -> Result<SpawnedProcess, std::io::Error> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| std::io::Error::other(format!("{engine}: empty argv")))?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::inherit())
        .stdin(std::process::Stdio::null());

    let mut child = command.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other(format!("{engine}: failed to capture stdout")))?;

    Ok(SpawnedProcess {
        child,
        stdout_lines: BufReader::new(stdout).lines(),
    })
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
