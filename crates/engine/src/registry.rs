//! The model registry: acquire every capability once, hand out handles
//! forever.
//!
//! Handles are `Arc<Mutex<..>>` so access to each capability is serialized;
//! the underlying backends are not assumed safe for concurrent invocation.
//! `get()` before `initialize()` yields [`CoreError::NotReady`], which the
//! HTTP layer maps to 503.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

use cre8_core::error::CoreError;

use crate::capability::{
    Captioner, CommandCaptioner, CommandGenerator, Generator, ModelKind,
};
use crate::config::EngineConfig;

/// Shared, serialized handle to one generative capability.
pub type ModelHandle = Arc<Mutex<Box<dyn Generator>>>;

/// Shared, serialized handle to the captioning capability.
pub type CaptionerHandle = Arc<Mutex<Box<dyn Captioner>>>;

struct RegistryInner {
    generators: HashMap<ModelKind, ModelHandle>,
    captioner: CaptionerHandle,
}

/// Process-wide owner of every generative capability.
///
/// Created empty, populated exactly once by [`initialize`] (or
/// [`initialize_with`] in tests), then read-only for the process lifetime.
///
/// [`initialize`]: ModelRegistry::initialize
/// [`initialize_with`]: ModelRegistry::initialize_with
pub struct ModelRegistry {
    inner: OnceLock<RegistryInner>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Acquire every capability from `config`. Must run exactly once; a
    /// failure here is process-fatal for the caller, since partial
    /// availability would yield silently broken endpoints.
    pub fn initialize(&self, config: &EngineConfig) -> Result<(), CoreError> {
        let timeout = config.process_timeout;
        let mut generators: HashMap<ModelKind, ModelHandle> = HashMap::new();
        for &kind in ModelKind::generators() {
            let command = match kind {
                ModelKind::Speech => &config.speech_command,
                ModelKind::Music => &config.music_command,
                ModelKind::Video => &config.video_command,
                ModelKind::Animation => &config.animation_command,
                ModelKind::ImageDiffusion => &config.image_command,
                ModelKind::ImageAnimation => &config.image_animation_command,
                ModelKind::Captioning => unreachable!("captioning is not a generator"),
            };
            let generator = CommandGenerator::new(kind, command, timeout)?;
            generators.insert(kind, Arc::new(Mutex::new(Box::new(generator) as Box<dyn Generator>)));
            tracing::info!(capability = kind.as_str(), "Capability acquired");
        }

        let captioner = CommandCaptioner::new(&config.caption_command, timeout)?;
        self.install(
            generators,
            Arc::new(Mutex::new(Box::new(captioner) as Box<dyn Captioner>)),
        )
    }

    /// Install pre-built handles. Used by tests to inject stub capabilities
    /// through the production traits.
    pub fn initialize_with(
        &self,
        generators: HashMap<ModelKind, Box<dyn Generator>>,
        captioner: Box<dyn Captioner>,
    ) -> Result<(), CoreError> {
        let generators = generators
            .into_iter()
            .map(|(kind, generator)| (kind, Arc::new(Mutex::new(generator))))
            .collect();
        self.install(generators, Arc::new(Mutex::new(captioner)))
    }

    fn install(
        &self,
        generators: HashMap<ModelKind, ModelHandle>,
        captioner: CaptionerHandle,
    ) -> Result<(), CoreError> {
        let inner = RegistryInner {
            generators,
            captioner,
        };
        self.inner
            .set(inner)
            .map_err(|_| CoreError::Internal("model registry already initialized".into()))?;
        tracing::info!("Model registry initialized, all capabilities resident");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Cheap readiness gate for handlers; every generation endpoint calls
    /// this before doing any work that touches a capability.
    pub fn ensure_ready(&self) -> Result<(), CoreError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(CoreError::NotReady {
                capability: "model registry",
            })
        }
    }

    /// Return the resident handle for `kind`.
    pub fn get(&self, kind: ModelKind) -> Result<ModelHandle, CoreError> {
        let inner = self.inner.get().ok_or(CoreError::NotReady {
            capability: kind.as_str(),
        })?;
        inner
            .generators
            .get(&kind)
            .cloned()
            .ok_or(CoreError::NotReady {
                capability: kind.as_str(),
            })
    }

    /// Return the resident captioning handle.
    pub fn captioner(&self) -> Result<CaptionerHandle, CoreError> {
        let inner = self.inner.get().ok_or(CoreError::NotReady {
            capability: ModelKind::Captioning.as_str(),
        })?;
        Ok(Arc::clone(&inner.captioner))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
