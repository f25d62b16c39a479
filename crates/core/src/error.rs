//! Shared error taxonomy for the generation pipeline.
//!
//! Every layer (validation, registry, caption bridge, renderer adapter,
//! artifact handling) funnels into [`CoreError`]; the HTTP layer maps each
//! variant onto a status code and error code.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad or out-of-range request input. No generation is attempted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A capability was requested before the model registry finished
    /// initializing.
    #[error("Capability not ready: {capability}")]
    NotReady { capability: &'static str },

    /// A capability or the external renderer ran but failed. Carries the
    /// captured diagnostic output.
    #[error("Generation failed: {detail}")]
    Generation { detail: String },

    /// A generation call reported success but the output file is absent.
    #[error("Artifact missing after generation: {path}")]
    ArtifactMissing { path: String },

    /// An external process could not be launched at all (binary missing,
    /// permission denied). Distinct from a non-zero exit code.
    #[error("Failed to spawn process: {detail}")]
    Spawn { detail: String },

    /// An internal fault (I/O, configuration) not attributable to the caller.
    #[error("Internal error: {0}")]
    Internal(String),
}
