//! The external renderer adapter.
//!
//! A generic "run this external renderer and report what happened"
//! primitive: it never interprets the semantic meaning of arguments, and a
//! non-zero exit code is reported, not raised. The router decides
//! success/failure from the outcome.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use cre8_core::error::CoreError;
use cre8_core::renderer::RenderInvocation;

use crate::subprocess;

/// Result of one renderer run. Both streams are captured fully.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RenderOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Diagnostic text for error surfaces: stderr, falling back to stdout.
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Seam for the external image renderer; tests substitute a double that
/// simulates success/failure without invoking the real binary.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    async fn render(&self, invocation: &RenderInvocation) -> Result<RenderOutcome, CoreError>;
}

/// Production renderer spawning the configured binary as a child process.
pub struct SdProcessRenderer {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl SdProcessRenderer {
    pub fn new(binary: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ImageRenderer for SdProcessRenderer {
    async fn render(&self, invocation: &RenderInvocation) -> Result<RenderOutcome, CoreError> {
        subprocess::ensure_executable(&self.binary).await?;

        let args = invocation.to_args();
        tracing::info!(binary = %self.binary.display(), "Invoking external renderer");
        tracing::debug!(?args, "Renderer arguments");

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args);
        let out = subprocess::run_captured(&mut cmd, self.timeout).await?;

        if out.exit_code != 0 {
            tracing::error!(
                exit_code = out.exit_code,
                stderr = %out.stderr,
                "External renderer reported failure"
            );
        } else {
            tracing::info!(duration_ms = out.duration_ms, "External renderer finished");
        }

        Ok(RenderOutcome {
            exit_code: out.exit_code,
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
