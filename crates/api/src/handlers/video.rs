//! Text-to-video endpoint.

use axum::extract::{Multipart, State};
use axum::response::Response;

use cre8_core::media::{MediaKind, RequestToken};
use cre8_core::params::{validate_frames, validate_guidance_scale, validate_prompt, validate_steps};
use cre8_engine::capability::{GenerationJob, ModelKind};

use crate::error::AppResult;
use crate::forms;
use crate::handlers::{prepare_output, serve_artifact};
use crate::state::AppState;

const DEFAULT_FRAMES: u32 = 16;
const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;
const DEFAULT_STEPS: u32 = 25;

/// `POST /text2video/`: render `prompt` as an MP4 clip.
pub async fn text2video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let prompt = form.required("prompt")?;
    let frames = form.parse_or::<u32>("num_frames", DEFAULT_FRAMES)?;
    let guidance = form.parse_or::<f32>("guidance_scale", DEFAULT_GUIDANCE_SCALE)?;
    let steps = form.parse_or::<u32>("num_inference_steps", DEFAULT_STEPS)?;
    let seed = form.parse_opt::<u64>("seed")?;
    validate_prompt(prompt)?;
    validate_frames(frames)?;
    validate_guidance_scale(guidance)?;
    validate_steps(steps)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let output = prepare_output(&state, MediaKind::Video, &token).await?;

    let mut job = GenerationJob::new(prompt, &output);
    job.num_frames = Some(frames);
    job.guidance_scale = Some(guidance);
    job.steps = Some(steps);
    job.seed = seed;
    let handle = state.registry.get(ModelKind::Video)?;
    handle.lock().await.generate(&job).await?;

    serve_artifact(MediaKind::Video, &output).await
}
