//! Capability traits and their command-backed implementations.
//!
//! A capability is an opaque generative function: `generate(job)` produces
//! a file at `job.output`, `describe(image, instruction)` produces text.
//! Production implementations invoke one configured inference command per
//! kind; tests substitute stubs through the same traits.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use cre8_core::error::CoreError;

use crate::subprocess;

/// The resident model capabilities held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Speech,
    Music,
    Video,
    Animation,
    ImageDiffusion,
    ImageAnimation,
    Captioning,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Speech => "speech",
            ModelKind::Music => "music",
            ModelKind::Video => "video",
            ModelKind::Animation => "animation",
            ModelKind::ImageDiffusion => "image-diffusion",
            ModelKind::ImageAnimation => "image-animation",
            ModelKind::Captioning => "captioning",
        }
    }

    /// Every generator kind (captioning is held separately).
    pub fn generators() -> &'static [ModelKind] {
        &[
            ModelKind::Speech,
            ModelKind::Music,
            ModelKind::Video,
            ModelKind::Animation,
            ModelKind::ImageDiffusion,
            ModelKind::ImageAnimation,
        ]
    }
}

/// Per-call parameters for a generation capability. Immutable once built;
/// fields the kind does not use stay `None`.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub steps: Option<u32>,
    pub guidance_scale: Option<f32>,
    pub num_frames: Option<u32>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub duration_secs: Option<u32>,
    pub seed: Option<u64>,
    /// Staged upload path for image-conditioned kinds.
    pub init_image: Option<PathBuf>,
    /// Where the capability must write its artifact.
    pub output: PathBuf,
}

impl GenerationJob {
    /// A job with only the required fields set.
    pub fn new(prompt: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            steps: None,
            guidance_scale: None,
            num_frames: None,
            height: None,
            width: None,
            duration_secs: None,
            seed: None,
            init_image: None,
            output: output.into(),
        }
    }
}

/// One opaque generative capability.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce an artifact at `job.output`, or fail. Implementations must
    /// not report success when the output file was not written.
    async fn generate(&self, job: &GenerationJob) -> Result<(), CoreError>;
}

/// The vision-language captioning capability.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Describe the image at `image` following `instruction`, bounded to
    /// `max_new_tokens` output tokens. Empty output is valid.
    async fn describe(
        &self,
        image: &Path,
        instruction: &str,
        max_new_tokens: u32,
    ) -> Result<String, CoreError>;
}

// ---------------------------------------------------------------------------
// Command-backed implementations
// ---------------------------------------------------------------------------

/// Production [`Generator`] invoking a configured inference command.
#[derive(Debug)]
pub struct CommandGenerator {
    kind: ModelKind,
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandGenerator {
    pub fn new(
        kind: ModelKind,
        command: &[String],
        timeout: Option<Duration>,
    ) -> Result<Self, CoreError> {
        let (program, base_args) = command.split_first().ok_or_else(|| CoreError::Internal(
            format!("empty command configured for capability '{}'", kind.as_str()),
        ))?;
        Ok(Self {
            kind,
            program: program.clone(),
            base_args: base_args.to_vec(),
            timeout,
        })
    }

    /// Flag vector appended after the configured base arguments. Only set
    /// fields emit their flag.
    fn job_args(job: &GenerationJob) -> Vec<String> {
        let mut args = vec![
            "--prompt".to_string(),
            job.prompt.clone(),
            "--output".to_string(),
            job.output.to_string_lossy().into_owned(),
        ];
        if let Some(negative) = &job.negative_prompt {
            args.push("--negative-prompt".into());
            args.push(negative.clone());
        }
        if let Some(steps) = job.steps {
            args.push("--steps".into());
            args.push(steps.to_string());
        }
        if let Some(scale) = job.guidance_scale {
            args.push("--guidance-scale".into());
            args.push(scale.to_string());
        }
        if let Some(frames) = job.num_frames {
            args.push("--frames".into());
            args.push(frames.to_string());
        }
        if let Some(height) = job.height {
            args.push("--height".into());
            args.push(height.to_string());
        }
        if let Some(width) = job.width {
            args.push("--width".into());
            args.push(width.to_string());
        }
        if let Some(duration) = job.duration_secs {
            args.push("--duration".into());
            args.push(duration.to_string());
        }
        if let Some(seed) = job.seed {
            args.push("--seed".into());
            args.push(seed.to_string());
        }
        if let Some(image) = &job.init_image {
            args.push("--init-image".into());
            args.push(image.to_string_lossy().into_owned());
        }
        args
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    async fn generate(&self, job: &GenerationJob) -> Result<(), CoreError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args).args(Self::job_args(job));

        tracing::debug!(capability = self.kind.as_str(), program = %self.program, "Invoking capability");
        let out = subprocess::run_captured(&mut cmd, self.timeout).await?;

        if out.exit_code != 0 {
            tracing::error!(
                capability = self.kind.as_str(),
                exit_code = out.exit_code,
                stderr = %out.stderr,
                "Capability failed"
            );
            let diagnostic = if out.stderr.trim().is_empty() {
                out.stdout
            } else {
                out.stderr
            };
            return Err(CoreError::Generation {
                detail: format!(
                    "{} capability exited with code {}: {}",
                    self.kind.as_str(),
                    out.exit_code,
                    diagnostic.trim()
                ),
            });
        }

        tracing::info!(
            capability = self.kind.as_str(),
            duration_ms = out.duration_ms,
            output = %job.output.display(),
            "Capability finished"
        );
        Ok(())
    }
}

/// Production [`Captioner`] invoking the configured captioning command and
/// reading the caption from its stdout.
pub struct CommandCaptioner {
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandCaptioner {
    pub fn new(command: &[String], timeout: Option<Duration>) -> Result<Self, CoreError> {
        let (program, base_args) = command.split_first().ok_or_else(|| {
            CoreError::Internal("empty command configured for capability 'captioning'".into())
        })?;
        Ok(Self {
            program: program.clone(),
            base_args: base_args.to_vec(),
            timeout,
        })
    }
}

#[async_trait]
impl Captioner for CommandCaptioner {
    async fn describe(
        &self,
        image: &Path,
        instruction: &str,
        max_new_tokens: u32,
    ) -> Result<String, CoreError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .arg("--image")
            .arg(image)
            .arg("--instruction")
            .arg(instruction)
            .arg("--max-new-tokens")
            .arg(max_new_tokens.to_string());

        let out = subprocess::run_captured(&mut cmd, self.timeout).await?;

        if out.exit_code != 0 {
            return Err(CoreError::Generation {
                detail: format!(
                    "captioning capability exited with code {}: {}",
                    out.exit_code,
                    out.stderr.trim()
                ),
            });
        }
        Ok(out.stdout)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_args_minimal_has_prompt_and_output_only() {
        let job = GenerationJob::new("hello world", "/tmp/out.wav");
        let args = CommandGenerator::job_args(&job);
        assert_eq!(args, vec!["--prompt", "hello world", "--output", "/tmp/out.wav"]);
    }

    #[test]
    fn job_args_emit_flags_only_for_set_fields() {
        let mut job = GenerationJob::new("p", "/tmp/o.gif");
        job.negative_prompt = Some("bad quality".into());
        job.steps = Some(25);
        job.guidance_scale = Some(7.5);
        job.num_frames = Some(16);
        job.seed = Some(42);
        job.init_image = Some(PathBuf::from("/tmp/in.png"));
        let args = CommandGenerator::job_args(&job);
        for flag in ["--negative-prompt", "--steps", "--guidance-scale", "--frames", "--seed", "--init-image"] {
            assert!(args.contains(&flag.to_string()), "missing {flag}");
        }
        assert!(!args.contains(&"--duration".to_string()));
        assert!(!args.contains(&"--height".to_string()));
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = CommandGenerator::new(ModelKind::Speech, &[], None).unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_stderr_as_generation_error() {
        let command = vec![
            "/bin/sh".to_string(),
            "-c".to_string(),
            "echo out of memory >&2; exit 1".to_string(),
        ];
        // The shell ignores the appended flags; only the exit path matters here.
        let gen = CommandGenerator::new(ModelKind::Music, &command, None).unwrap();
        let job = GenerationJob::new("p", "/tmp/never-written.wav");
        let err = gen.generate(&job).await.unwrap_err();
        match err {
            CoreError::Generation { detail } => {
                assert!(detail.contains("out of memory"));
                assert!(detail.contains("music"));
            }
            other => panic!("expected Generation, got {other:?}"),
        }
    }
}
