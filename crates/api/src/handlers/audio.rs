//! Audio endpoints: text-to-speech, text-to-music, and image-to-sound.

use axum::extract::{Multipart, State};
use axum::response::Response;

use cre8_core::error::CoreError;
use cre8_core::media::{MediaKind, RequestToken};
use cre8_core::params::{validate_duration, validate_prompt};
use cre8_core::prompt::SOUND_CAPTION_INSTRUCTION;
use cre8_engine::capability::{GenerationJob, ModelKind};

use crate::error::AppResult;
use crate::forms;
use crate::handlers::{discard, prepare_output, serve_artifact, stage_upload};
use crate::state::AppState;

/// Default clip length in seconds for music and image-to-sound.
const DEFAULT_DURATION_SECS: u32 = 10;

/// `POST /text2speech/`: synthesize narration for `prompt`.
pub async fn text2speech(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let prompt = form.required("prompt")?;
    validate_prompt(prompt)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let output = prepare_output(&state, MediaKind::Speech, &token).await?;

    let job = GenerationJob::new(prompt, &output);
    let handle = state.registry.get(ModelKind::Speech)?;
    handle.lock().await.generate(&job).await?;

    serve_artifact(MediaKind::Speech, &output).await
}

/// `POST /text2music/`: compose a clip for `prompt`, `duration` seconds long.
pub async fn text2music(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let prompt = form.required("prompt")?;
    let duration = form.parse_or::<u32>("duration", DEFAULT_DURATION_SECS)?;
    validate_prompt(prompt)?;
    validate_duration(duration)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let output = prepare_output(&state, MediaKind::Music, &token).await?;

    let mut job = GenerationJob::new(prompt, &output);
    job.duration_secs = Some(duration);
    let handle = state.registry.get(ModelKind::Music)?;
    handle.lock().await.generate(&job).await?;

    serve_artifact(MediaKind::Music, &output).await
}

/// `POST /img2sound/`: caption the uploaded image with the audio-oriented
/// instruction and condition the music capability on that caption alone.
pub async fn img2sound(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = forms::collect(multipart).await?;
    let upload = form.required_file()?;
    let duration = form.parse_or::<u32>("duration", DEFAULT_DURATION_SECS)?;
    validate_duration(duration)?;
    state.registry.ensure_ready()?;

    let token = RequestToken::new();
    let staged = stage_upload(&state, &token, upload).await?;
    let output = prepare_output(&state, MediaKind::Sound, &token).await?;

    let result = async {
        let caption = state
            .captions
            .describe(&staged, SOUND_CAPTION_INSTRUCTION)
            .await?;
        if caption.is_empty() {
            return Err(CoreError::Generation {
                detail: "caption capability produced no description to sonify".into(),
            });
        }

        let mut job = GenerationJob::new(caption, &output);
        job.duration_secs = Some(duration);
        let handle = state.registry.get(ModelKind::Music)?;
        let generated = handle.lock().await.generate(&job).await;
        generated
    }
    .await;
    discard(&staged).await;
    result?;

    serve_artifact(MediaKind::Sound, &output).await
}
