//! The shared style-transfer handler.
//!
//! Every style route runs this one function against its
//! [`StyleProfile`]; the profile decides the checkpoint, the prompt
//! assembly, and whether the upload is captioned at all. Renderer tunables
//! share one set of defaults across all styles except the denoising
//! strength, which each profile fixes for itself.

use axum::extract::{Multipart, State};
use axum::response::Response;

use cre8_core::error::CoreError;
use cre8_core::media::{MediaKind, RequestToken};
use cre8_core::params::{
    validate_cfg_scale, validate_control_strength, validate_dimensions,
    validate_sampling_method, validate_steps, validate_strength, validate_style_ratio,
};
use cre8_core::renderer::RenderInvocation;
use cre8_core::style::StyleProfile;

use crate::error::AppResult;
use crate::forms;
use crate::handlers::{discard, prepare_output, serve_artifact, stage_upload};
use crate::state::AppState;

const DEFAULT_DIMENSION: u32 = 512;
const DEFAULT_STYLE_RATIO: u32 = 80;
const DEFAULT_CFG_SCALE: f32 = 15.0;
const DEFAULT_CONTROL_STRENGTH: f32 = 1.0;
const DEFAULT_STEPS: u32 = 100;
const DEFAULT_SAMPLING_METHOD: &str = "euler_a";
/// `-1` asks the renderer to pick a random seed.
const DEFAULT_SEED: i64 = -1;

/// `POST` handler shared by every style route.
pub async fn transform(
    State(state): State<AppState>,
    profile: &'static StyleProfile,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let upload = form.required_file()?;
    // Optional; the style template carries the conditioning on its own.
    let prompt = form.text_or("prompt", "");
    let strength = form.parse_or::<f32>("strength", profile.default_strength)?;
    let style_ratio = form.parse_or::<u32>("style_ratio", DEFAULT_STYLE_RATIO)?;
    let cfg_scale = form.parse_or::<f32>("cfg_scale", DEFAULT_CFG_SCALE)?;
    let control_strength = form.parse_or::<f32>("control_strength", DEFAULT_CONTROL_STRENGTH)?;
    let steps = form.parse_or::<u32>("steps", DEFAULT_STEPS)?;
    let sampling_method = form.text_or("sampling_method", DEFAULT_SAMPLING_METHOD);
    let height = form.parse_or::<u32>("height", DEFAULT_DIMENSION)?;
    let width = form.parse_or::<u32>("width", DEFAULT_DIMENSION)?;
    let seed = form.parse_or::<i64>("seed", DEFAULT_SEED)?;
    validate_strength(strength)?;
    validate_style_ratio(style_ratio)?;
    validate_cfg_scale(cfg_scale)?;
    validate_control_strength(control_strength)?;
    validate_steps(steps)?;
    validate_sampling_method(&sampling_method)?;
    validate_dimensions(height, width)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let staged = stage_upload(&state, &token, upload).await?;
    let output = prepare_output(&state, MediaKind::Image, &token).await?;

    let result = async {
        let caption = match profile.caption_instruction {
            Some(instruction) => state.captions.describe(&staged, instruction).await?,
            None => String::new(),
        };
        let prompts = profile.compose(&prompt, &caption);

        let invocation = RenderInvocation {
            model: state.engine.model_dir.join(profile.checkpoint),
            lora_model_dir: profile
                .uses_lora_dir
                .then(|| state.engine.lora_model_dir.clone()),
            vae: profile.vae.map(|vae| state.engine.model_dir.join(vae)),
            prompt: prompts.positive,
            negative_prompt: prompts.negative,
            input: staged.clone(),
            output: output.clone(),
            strength: Some(strength),
            style_ratio: Some(style_ratio),
            cfg_scale: Some(cfg_scale),
            control_strength: Some(control_strength),
            steps: Some(steps),
            sampling_method: Some(sampling_method),
            seed: Some(seed),
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
