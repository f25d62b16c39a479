//! Animation endpoints: text-to-animation and image-to-animation.

use axum::extract::{Multipart, State};
use axum::response::Response;

use cre8_core::media::{MediaKind, RequestToken};
use cre8_core::params::{
    validate_frames, validate_guidance_scale, validate_prompt, validate_steps,
};
use cre8_core::prompt::{
    caption_then_prompt, ANIMATION_NEGATIVE_PROMPT, DEFAULT_CAPTION_INSTRUCTION,
};
use cre8_engine::capability::{GenerationJob, ModelKind};

use crate::error::AppResult;
use crate::forms;
use crate::handlers::{discard, prepare_output, serve_artifact, stage_upload};
use crate::state::AppState;

const DEFAULT_FRAMES: u32 = 16;
const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;
const DEFAULT_STEPS: u32 = 25;
const DEFAULT_SEED: u64 = 42;

struct AnimationParams {
    negative_prompt: String,
    frames: u32,
    guidance: f32,
    steps: u32,
    seed: u64,
}

/// Parse and validate the tunables shared by both animation endpoints.
fn animation_params(form: &forms::FormData) -> AppResult<AnimationParams> {
    let negative_prompt = form.text_or("negative_prompt", ANIMATION_NEGATIVE_PROMPT);
    let frames = form.parse_or::<u32>("num_frames", DEFAULT_FRAMES)?;
    let guidance = form.parse_or::<f32>("guidance_scale", DEFAULT_GUIDANCE_SCALE)?;
    let steps = form.parse_or::<u32>("num_inference_steps", DEFAULT_STEPS)?;
    let seed = form.parse_or::<u64>("seed", DEFAULT_SEED)?;
    validate_frames(frames)?;
    validate_guidance_scale(guidance)?;
    validate_steps(steps)?;
    Ok(AnimationParams {
        negative_prompt,
        frames,
        guidance,
        steps,
        seed,
    })
}

fn animation_job(prompt: String, output: &std::path::Path, params: AnimationParams) -> GenerationJob {
    let mut job = GenerationJob::new(prompt, output);
    job.negative_prompt = Some(params.negative_prompt);
    job.num_frames = Some(params.frames);
    job.guidance_scale = Some(params.guidance);
    job.steps = Some(params.steps);
    job.seed = Some(params.seed);
    job
}

/// `POST /text2animation/`: animate `prompt` as a GIF.
pub async fn text2animation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let prompt = form.required("prompt")?;
    validate_prompt(prompt)?;
    let params = animation_params(&form)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let output = prepare_output(&state, MediaKind::Animation, &token).await?;

    let job = animation_job(prompt.to_string(), &output, params);
    let handle = state.registry.get(ModelKind::Animation)?;
    handle.lock().await.generate(&job).await?;

    serve_artifact(MediaKind::Animation, &output).await
}

/// `POST /img2animation/`: caption the upload, prepend the caption to the
/// caller's prompt, and animate from the uploaded image.
pub async fn img2animation(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let upload = form.required_file()?;
    // The caption supplies the conditioning text when no prompt is sent.
    let prompt = form.text_or("prompt", "");
    let params = animation_params(&form)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let staged = stage_upload(&state, &token, upload).await?;
    let output = prepare_output(&state, MediaKind::Animation, &token).await?;

    let result = async {
        let caption = state
            .captions
            .describe(&staged, DEFAULT_CAPTION_INSTRUCTION)
            .await?;

        let mut job = animation_job(caption_then_prompt(&prompt, &caption), &output, params);
        job.init_image = Some(staged.clone());
        let handle = state.registry.get(ModelKind::ImageAnimation)?;
        let generated = handle.lock().await.generate(&job).await;
        generated
    }
    .await;
    discard(&staged).await;
    result?;

    serve_artifact(MediaKind::Animation, &output).await
}
