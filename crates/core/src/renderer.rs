//! Argument assembly for the external image renderer.
//!
//! The adapter that spawns the binary never interprets these values; this
//! module is the single place that knows the renderer's flag grammar.
//! Optional fields append their flag only when set, so one invocation type
//! covers plain img2img and every style profile.

use std::path::PathBuf;

/// One fully-assembled external renderer call.
#[derive(Debug, Clone)]
pub struct RenderInvocation {
    /// Checkpoint path passed as `-m`.
    pub model: PathBuf,
    /// Optional LoRA model directory (`--lora-model-dir`).
    pub lora_model_dir: Option<PathBuf>,
    /// Optional VAE path (`--vae`).
    pub vae: Option<PathBuf>,
    /// Positive prompt (`-p`).
    pub prompt: String,
    /// Negative prompt (`--negative-prompt`).
    pub negative_prompt: String,
    /// Input image path (`-i`).
    pub input: PathBuf,
    /// Output image path (`-o`).
    pub output: PathBuf,
    pub strength: Option<f32>,
    pub style_ratio: Option<u32>,
    pub cfg_scale: Option<f32>,
    pub control_strength: Option<f32>,
    pub steps: Option<u32>,
    pub sampling_method: Option<String>,
    /// Renderer seed; the style endpoints pass `-1` (random).
    pub seed: Option<i64>,
    pub height: u32,
    pub width: u32,
}

impl RenderInvocation {
    /// Produce the full argument vector, flags in fixed order. All values
    /// are stringified; the renderer parses them back.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--mode".into(),
            "img2img".into(),
            "-m".into(),
            self.model.to_string_lossy().into_owned(),
        ];
        if let Some(dir) = &self.lora_model_dir {
            args.push("--lora-model-dir".into());
            args.push(dir.to_string_lossy().into_owned());
        }
        if let Some(vae) = &self.vae {
            args.push("--vae".into());
            args.push(vae.to_string_lossy().into_owned());
        }
        args.push("-p".into());
        args.push(self.prompt.clone());
        args.push("--negative-prompt".into());
        args.push(self.negative_prompt.clone());
        args.push("-i".into());
        args.push(self.input.to_string_lossy().into_owned());
        args.push("-o".into());
        args.push(self.output.to_string_lossy().into_owned());
        if let Some(strength) = self.strength {
            args.push("--strength".into());
            args.push(strength.to_string());
        }
        if let Some(ratio) = self.style_ratio {
            args.push("--style-ratio".into());
            args.push(ratio.to_string());
        }
        if let Some(scale) = self.cfg_scale {
            args.push("--cfg-scale".into());
            args.push(scale.to_string());
        }
        if let Some(control) = self.control_strength {
            args.push("--control-strength".into());
            args.push(control.to_string());
        }
        if let Some(steps) = self.steps {
            args.push("--steps".into());
            args.push(steps.to_string());
        }
        if let Some(method) = &self.sampling_method {
            args.push("--sampling-method".into());
            args.push(method.clone());
        }
        if let Some(seed) = self.seed {
            args.push("--seed".into());
            args.push(seed.to_string());
        }
        args.push("--height".into());
        args.push(self.height.to_string());
        args.push("--width".into());
        args.push(self.width.to_string());
        args
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
