//! Engine configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Paths and commands for every external capability.
///
/// Each `*_command` is a whitespace-separated program + fixed arguments; the
/// per-request parameters are appended as flags by the capability. Defaults
/// point at an `inference/` directory of driver scripts next to the binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding diffusion checkpoints and VAEs.
    pub model_dir: PathBuf,
    /// LoRA model directory handed to the external renderer.
    pub lora_model_dir: PathBuf,
    /// Path to the external image renderer binary.
    pub sd_binary: PathBuf,
    /// Optional wall-clock limit for any child process; `None` means wait
    /// forever.
    pub process_timeout: Option<Duration>,
    pub speech_command: Vec<String>,
    pub music_command: Vec<String>,
    pub video_command: Vec<String>,
    pub animation_command: Vec<String>,
    pub image_command: Vec<String>,
    pub image_animation_command: Vec<String>,
    pub caption_command: Vec<String>,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `MODEL_DIR`            | `./models`                       |
    /// | `LORA_MODEL_DIR`       | `<MODEL_DIR>/lora`               |
    /// | `SD_BINARY`            | `./bin/sd`                       |
    /// | `PROCESS_TIMEOUT_SECS` | unset (no timeout)               |
    /// | `SPEECH_CMD`           | `python inference/speech.py`     |
    /// | `MUSIC_CMD`            | `python inference/music.py`      |
    /// | `VIDEO_CMD`            | `python inference/video.py`      |
    /// | `ANIMATION_CMD`        | `python inference/animation.py`  |
    /// | `IMAGE_CMD`            | `python inference/image.py`      |
    /// | `IMAGE_ANIMATION_CMD`  | `python inference/img2animation.py` |
    /// | `CAPTION_CMD`          | `python inference/caption.py`    |
    pub fn from_env() -> Self {
        let model_dir =
            PathBuf::from(std::env::var("MODEL_DIR").unwrap_or_else(|_| "./models".into()));
        let lora_model_dir = std::env::var("LORA_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| model_dir.join("lora"));
        let sd_binary =
            PathBuf::from(std::env::var("SD_BINARY").unwrap_or_else(|_| "./bin/sd".into()));

        let process_timeout = std::env::var("PROCESS_TIMEOUT_SECS")
            .ok()
            .map(|v| {
                let secs: u64 = v
                    .parse()
                    .expect("PROCESS_TIMEOUT_SECS must be a valid u64");
                Duration::from_secs(secs)
            });

        Self {
            model_dir,
            lora_model_dir,
            sd_binary,
            process_timeout,
            speech_command: command_from_env("SPEECH_CMD", "python inference/speech.py"),
            music_command: command_from_env("MUSIC_CMD", "python inference/music.py"),
            video_command: command_from_env("VIDEO_CMD", "python inference/video.py"),
            animation_command: command_from_env("ANIMATION_CMD", "python inference/animation.py"),
            image_command: command_from_env("IMAGE_CMD", "python inference/image.py"),
            image_animation_command: command_from_env(
                "IMAGE_ANIMATION_CMD",
                "python inference/img2animation.py",
            ),
            caption_command: command_from_env("CAPTION_CMD", "python inference/caption.py"),
        }
    }
}

/// Parse a whitespace-separated command line from `var`, falling back to
/// `default`.
fn command_from_env(var: &str, default: &str) -> Vec<String> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    raw.split_whitespace().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
