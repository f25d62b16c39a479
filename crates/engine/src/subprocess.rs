//! Shared child-process execution.
//!
//! Provides [`run_captured`], the common spawn + capture logic used by the
//! command-backed capabilities and the external renderer adapter: piped
//! stdio, full (bounded) capture of both streams, and an optional
//! wall-clock timeout that kills the child on expiry.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use cre8_core::error::CoreError;

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// Output beyond this limit is truncated to bound memory use under very
/// verbose renderers.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Captured result of one child-process run.
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Spawn `cmd`, capture stdout/stderr fully, and wait for completion.
///
/// A spawn failure maps to [`CoreError::Spawn`]. A timeout (when `timeout`
/// is set) kills the child via `kill_on_drop` and maps to
/// [`CoreError::Generation`] with the elapsed time. A non-zero exit code is
/// *not* an error here; callers decide what it means.
pub async fn run_captured(
    cmd: &mut Command,
    timeout: Option<Duration>,
) -> Result<CaptureOutput, CoreError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|e| CoreError::Spawn {
        detail: e.to_string(),
    })?;

    // Take stdout/stderr handles and read them in spawned tasks so we can
    // still call `child.wait()` (which borrows `&mut child`).
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(result) => result,
            Err(_elapsed) => {
                // `child` is dropped here; kill_on_drop terminates it.
                return Err(CoreError::Generation {
                    detail: format!(
                        "process timed out after {}ms",
                        start.elapsed().as_millis()
                    ),
                });
            }
        },
        None => child.wait().await,
    }
    .map_err(|e| CoreError::Internal(format!("failed waiting on child process: {e}")))?;

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();

    Ok(CaptureOutput {
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        exit_code: status.code().unwrap_or(-1),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Verify that `path` exists and has execute permission before spawning.
pub async fn ensure_executable(path: &Path) -> Result<(), CoreError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|_| CoreError::Spawn {
        detail: format!("binary not found: {}", path.display()),
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = metadata.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(CoreError::Spawn {
                detail: format!("{} is not executable (mode {mode:#o})", path.display()),
            });
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;

    Ok(())
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
