//! Image endpoints: text-to-image and plain image-to-image.
//!
//! Text-to-image runs on the resident diffusion capability; image-to-image
//! goes through the external renderer with the base SD 1.5 checkpoint, the
//! same path the style profiles use.

use axum::extract::{Multipart, State};
use axum::response::Response;

use cre8_core::error::CoreError;
use cre8_core::media::{MediaKind, RequestToken};
use cre8_core::params::{
    validate_dimensions, validate_guidance_scale, validate_prompt, validate_steps,
    validate_strength,
};
use cre8_core::prompt::{prompt_then_caption, DEFAULT_CAPTION_INSTRUCTION, IMG2IMG_NEGATIVE_PROMPT};
use cre8_core::renderer::RenderInvocation;
use cre8_core::style::SD15_CHECKPOINT;
use cre8_engine::capability::{GenerationJob, ModelKind};

use crate::error::AppResult;
use crate::forms;
use crate::handlers::{discard, prepare_output, serve_artifact, stage_upload};
use crate::state::AppState;

const DEFAULT_DIMENSION: u32 = 512;
const DEFAULT_STEPS: u32 = 50;
const DEFAULT_GUIDANCE_SCALE: f32 = 3.5;
const DEFAULT_IMG2IMG_STRENGTH: f32 = 0.4;

/// `POST /text2img/`: render `prompt` with the diffusion capability.
pub async fn text2img(State(state): State<AppState>, multipart: Multipart) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let prompt = form.required("prompt")?;
    let height = form.parse_or::<u32>("height", DEFAULT_DIMENSION)?;
    let width = form.parse_or::<u32>("width", DEFAULT_DIMENSION)?;
    let steps = form.parse_or::<u32>("steps", DEFAULT_STEPS)?;
    let guidance = form.parse_or::<f32>("guidance_scale", DEFAULT_GUIDANCE_SCALE)?;
    let seed = form.parse_opt::<u64>("seed")?;
    validate_prompt(prompt)?;
    validate_dimensions(height, width)?;
    validate_steps(steps)?;
    validate_guidance_scale(guidance)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let output = prepare_output(&state, MediaKind::Image, &token).await?;

    let mut job = GenerationJob::new(prompt, &output);
    job.height = Some(height);
    job.width = Some(width);
    job.steps = Some(steps);
    job.guidance_scale = Some(guidance);
    job.seed = seed;
    let handle = state.registry.get(ModelKind::ImageDiffusion)?;
    handle.lock().await.generate(&job).await?;

    serve_artifact(MediaKind::Image, &output).await
}

/// `POST /img2img/`: caption the upload, append the caption to the caller's
/// prompt, and reimagine the image through the external renderer.
pub async fn img2img(State(state): State<AppState>, multipart: Multipart) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let upload = form.required_file()?;
    let prompt = form.required("prompt")?;
    let negative = form.text_or("negative_prompt", IMG2IMG_NEGATIVE_PROMPT);
    let strength = form.parse_or::<f32>("strength", DEFAULT_IMG2IMG_STRENGTH)?;
    let steps = form.parse_or::<u32>("steps", DEFAULT_STEPS)?;
    let height = form.parse_or::<u32>("height", DEFAULT_DIMENSION)?;
    let width = form.parse_or::<u32>("width", DEFAULT_DIMENSION)?;
    validate_prompt(prompt)?;
    validate_strength(strength)?;
    validate_steps(steps)?;
    validate_dimensions(height, width)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let staged = stage_upload(&state, &token, upload).await?;
    let output = prepare_output(&state, MediaKind::Image, &token).await?;

    let result = async {
        let caption = state
            .captions
            .describe(&staged, DEFAULT_CAPTION_INSTRUCTION)
            .await?;

        let invocation = RenderInvocation {
            model: state.engine.model_dir.join(SD15_CHECKPOINT),
            lora_model_dir: None,
            vae: None,
            prompt: prompt_then_caption(prompt, &caption),
            negative_prompt: negative,
            input: staged.clone(),
            output: output.clone(),
            strength: Some(strength),
            style_ratio: None,
            cfg_scale: None,
            control_strength: None,
            steps: Some(steps),
            sampling_method: None,
            seed: None,
            height,
            width,
        };

        let outcome = state.renderer.render(&invocation).await?;
        if !outcome.succeeded() {
            return Err(CoreError::Generation {
                detail: format!(
                    "renderer exited with code {}: {}",
                    outcome.exit_code,
                    outcome.diagnostic().trim()
                ),
            });
        }
        Ok(())
    }
    .await;
    discard(&staged).await;
    result?;

    serve_artifact(MediaKind::Image, &output).await
}
