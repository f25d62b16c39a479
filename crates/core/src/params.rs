//! Request parameter bounds and validation.
//!
//! Out-of-range values are rejected with [`CoreError::Validation`] before
//! any capability is touched; nothing is silently clamped. Defaults live
//! with the handlers that parse the form fields.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Inference step count bounds.
pub const MIN_STEPS: u32 = 1;
pub const MAX_STEPS: u32 = 100;

/// Classifier-free guidance scale bounds.
pub const MIN_GUIDANCE_SCALE: f32 = 0.0;
pub const MAX_GUIDANCE_SCALE: f32 = 20.0;

/// Animation frame count bounds.
pub const MIN_FRAMES: u32 = 1;
pub const MAX_FRAMES: u32 = 100;

/// Image dimension bounds. Dimensions must also be multiples of 8, which
/// the diffusion backends require.
pub const MIN_DIMENSION: u32 = 64;
pub const MAX_DIMENSION: u32 = 2048;

/// Audio duration bounds in seconds (music and image-to-sound).
pub const MIN_DURATION_SECS: u32 = 1;
pub const MAX_DURATION_SECS: u32 = 60;

/// Img2img denoising strength bounds.
pub const MIN_STRENGTH: f32 = 0.0;
pub const MAX_STRENGTH: f32 = 1.0;

/// Style ratio bounds (percentage).
pub const MAX_STYLE_RATIO: u32 = 100;

/// Renderer cfg-scale bounds.
pub const MIN_CFG_SCALE: f32 = 0.0;
pub const MAX_CFG_SCALE: f32 = 30.0;

/// Control strength bounds.
pub const MIN_CONTROL_STRENGTH: f32 = 0.0;
pub const MAX_CONTROL_STRENGTH: f32 = 2.0;

/// Sampling methods accepted by the external renderer.
pub const VALID_SAMPLING_METHODS: &[&str] = &[
    "euler", "euler_a", "heun", "dpm2", "dpm++2s_a", "dpm++2m", "dpm++2mv2", "ipndm", "ipndm_v",
    "lcm",
];

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt must not be empty".into()));
    }
    Ok(())
}

pub fn validate_steps(steps: u32) -> Result<(), CoreError> {
    if !(MIN_STEPS..=MAX_STEPS).contains(&steps) {
        return Err(CoreError::Validation(format!(
            "steps must be between {MIN_STEPS} and {MAX_STEPS}, got {steps}"
        )));
    }
    Ok(())
}

pub fn validate_guidance_scale(scale: f32) -> Result<(), CoreError> {
    if !scale.is_finite() || !(MIN_GUIDANCE_SCALE..=MAX_GUIDANCE_SCALE).contains(&scale) {
        return Err(CoreError::Validation(format!(
            "guidance_scale must be between {MIN_GUIDANCE_SCALE} and {MAX_GUIDANCE_SCALE}, got {scale}"
        )));
    }
    Ok(())
}

pub fn validate_frames(frames: u32) -> Result<(), CoreError> {
    if !(MIN_FRAMES..=MAX_FRAMES).contains(&frames) {
        return Err(CoreError::Validation(format!(
            "num_frames must be between {MIN_FRAMES} and {MAX_FRAMES}, got {frames}"
        )));
    }
    Ok(())
}

pub fn validate_dimensions(height: u32, width: u32) -> Result<(), CoreError> {
    for (name, value) in [("height", height), ("width", width)] {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
            return Err(CoreError::Validation(format!(
                "{name} must be between {MIN_DIMENSION} and {MAX_DIMENSION}, got {value}"
            )));
        }
        if value % 8 != 0 {
            return Err(CoreError::Validation(format!(
                "{name} must be a multiple of 8, got {value}"
            )));
        }
    }
    Ok(())
}

pub fn validate_duration(duration_secs: u32) -> Result<(), CoreError> {
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
        return Err(CoreError::Validation(format!(
            "duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds, got {duration_secs}"
        )));
    }
    Ok(())
}

pub fn validate_strength(strength: f32) -> Result<(), CoreError> {
    if !strength.is_finite() || !(MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        return Err(CoreError::Validation(format!(
            "strength must be between {MIN_STRENGTH} and {MAX_STRENGTH}, got {strength}"
        )));
    }
    Ok(())
}

pub fn validate_style_ratio(ratio: u32) -> Result<(), CoreError> {
    if ratio > MAX_STYLE_RATIO {
        return Err(CoreError::Validation(format!(
            "style_ratio must be at most {MAX_STYLE_RATIO}, got {ratio}"
        )));
    }
    Ok(())
}

pub fn validate_cfg_scale(scale: f32) -> Result<(), CoreError> {
    if !scale.is_finite() || !(MIN_CFG_SCALE..=MAX_CFG_SCALE).contains(&scale) {
        return Err(CoreError::Validation(format!(
            "cfg_scale must be between {MIN_CFG_SCALE} and {MAX_CFG_SCALE}, got {scale}"
        )));
    }
    Ok(())
}

pub fn validate_control_strength(strength: f32) -> Result<(), CoreError> {
    if !strength.is_finite() || !(MIN_CONTROL_STRENGTH..=MAX_CONTROL_STRENGTH).contains(&strength) {
        return Err(CoreError::Validation(format!(
            "control_strength must be between {MIN_CONTROL_STRENGTH} and {MAX_CONTROL_STRENGTH}, got {strength}"
        )));
    }
    Ok(())
}

pub fn validate_sampling_method(method: &str) -> Result<(), CoreError> {
    if VALID_SAMPLING_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid sampling_method '{method}'. Must be one of: {}",
            VALID_SAMPLING_METHODS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
