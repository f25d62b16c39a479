use std::sync::Arc;

use cre8_core::media::ArtifactStore;
use cre8_engine::caption::CaptionBridge;
use cre8_engine::config::EngineConfig;
use cre8_engine::registry::ModelRegistry;
use cre8_engine::renderer::ImageRenderer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The registry and
/// renderer are constructed once at process start and dependency-injected
/// here; no handler reaches for global mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Engine configuration (checkpoint paths, renderer binary).
    pub engine: Arc<EngineConfig>,
    /// Long-lived model handles, acquired once at startup.
    pub registry: Arc<ModelRegistry>,
    /// External image renderer adapter.
    pub renderer: Arc<dyn ImageRenderer>,
    /// Derived-caption adapter over the registry's captioning capability.
    pub captions: CaptionBridge,
    /// Per-request artifact and upload path layout.
    pub store: Arc<ArtifactStore>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        engine: EngineConfig,
        registry: Arc<ModelRegistry>,
        renderer: Arc<dyn ImageRenderer>,
    ) -> Self {
        let store = Arc::new(ArtifactStore::new(config.artifact_root.clone()));
        let captions = CaptionBridge::new(Arc::clone(&registry));
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            registry,
            renderer,
            captions,
            store,
        }
    }
}
