//! Shared test harness: stub capabilities behind the production traits, a
//! multipart request builder, and response helpers.

#![allow(dead_code)] // not every test file uses every helper

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cre8_api::config::ServerConfig;
use cre8_api::router::build_app_router;
use cre8_api::state::AppState;
use cre8_core::error::CoreError;
use cre8_core::renderer::RenderInvocation;
use cre8_engine::capability::{Captioner, GenerationJob, Generator, ModelKind};
use cre8_engine::config::EngineConfig;
use cre8_engine::registry::ModelRegistry;
use cre8_engine::renderer::{ImageRenderer, RenderOutcome};

pub const BOUNDARY: &str = "cre8-test-boundary";

/// Caption every stub captioner produces unless overridden.
pub const STUB_CAPTION: &str = "a quiet scene";

// ---------------------------------------------------------------------------
// Stub capabilities
// ---------------------------------------------------------------------------

/// What the stub generator does when invoked.
#[derive(Clone)]
pub enum GeneratorBehavior {
    /// Write the job's prompt bytes to the output path and succeed.
    WritePromptBytes,
    /// Fail with a generation error carrying this detail.
    Fail(String),
    /// Succeed without writing the output file.
    SkipWrite,
}

struct StubGenerator {
    behavior: GeneratorBehavior,
    jobs: Arc<StdMutex<Vec<GenerationJob>>>,
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, job: &GenerationJob) -> Result<(), CoreError> {
        self.jobs.lock().unwrap().push(job.clone());
        match &self.behavior {
            GeneratorBehavior::WritePromptBytes => {
                tokio::fs::write(&job.output, job.prompt.as_bytes())
                    .await
                    .map_err(|e| CoreError::Internal(e.to_string()))?;
                Ok(())
            }
            GeneratorBehavior::Fail(detail) => Err(CoreError::Generation {
                detail: detail.clone(),
            }),
            GeneratorBehavior::SkipWrite => Ok(()),
        }
    }
}

struct StubCaptioner {
    caption: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Captioner for StubCaptioner {
    async fn describe(
        &self,
        _image: &std::path::Path,
        _instruction: &str,
        _max_new_tokens: u32,
    ) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.caption.clone())
    }
}

struct StubRenderer {
    exit_code: i32,
    stderr: String,
    writes_output: bool,
    renders: Arc<StdMutex<Vec<RenderInvocation>>>,
}

/// Bytes the stub renderer writes on success.
pub const RENDERED_BYTES: &[u8] = b"rendered-image-bytes";

#[async_trait]
impl ImageRenderer for StubRenderer {
    async fn render(&self, invocation: &RenderInvocation) -> Result<RenderOutcome, CoreError> {
        self.renders.lock().unwrap().push(invocation.clone());
        if self.exit_code == 0 && self.writes_output {
            tokio::fs::write(&invocation.output, RENDERED_BYTES)
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?;
        }
        Ok(RenderOutcome {
            exit_code: self.exit_code,
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub app: Router,
    /// Every job the stub generators received, across all kinds.
    pub jobs: Arc<StdMutex<Vec<GenerationJob>>>,
    /// Every invocation the stub renderer received.
    pub renders: Arc<StdMutex<Vec<RenderInvocation>>>,
    /// How many times the captioner was asked for a description.
    pub caption_calls: Arc<AtomicUsize>,
    /// Artifact root; kept alive for the test's duration.
    pub root: tempfile::TempDir,
}

impl Harness {
    pub fn last_job(&self) -> GenerationJob {
        self.jobs.lock().unwrap().last().cloned().expect("no job recorded")
    }

    pub fn last_render(&self) -> RenderInvocation {
        self.renders
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no render recorded")
    }
}

pub struct HarnessBuilder {
    caption: String,
    generator: GeneratorBehavior,
    renderer_exit: i32,
    renderer_stderr: String,
    renderer_writes: bool,
    initialized: bool,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            caption: STUB_CAPTION.to_string(),
            generator: GeneratorBehavior::WritePromptBytes,
            renderer_exit: 0,
            renderer_stderr: String::new(),
            renderer_writes: true,
            initialized: true,
        }
    }
}

impl HarnessBuilder {
    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = caption.to_string();
        self
    }

    pub fn generator_fails(mut self, detail: &str) -> Self {
        self.generator = GeneratorBehavior::Fail(detail.to_string());
        self
    }

    pub fn generator_skips_write(mut self) -> Self {
        self.generator = GeneratorBehavior::SkipWrite;
        self
    }

    pub fn renderer_fails(mut self, exit_code: i32, stderr: &str) -> Self {
        self.renderer_exit = exit_code;
        self.renderer_stderr = stderr.to_string();
        self
    }

    pub fn renderer_skips_write(mut self) -> Self {
        self.renderer_writes = false;
        self
    }

    /// Leave the model registry uninitialized, as during startup.
    pub fn uninitialized(mut self) -> Self {
        self.initialized = false;
        self
    }

    pub fn build(self) -> Harness {
        let root = tempfile::tempdir().expect("create temp artifact root");

        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 600,
            artifact_root: root.path().to_path_buf(),
        };
        let engine = EngineConfig {
            model_dir: "/models".into(),
            lora_model_dir: "/models/lora".into(),
            sd_binary: "/bin/sd".into(),
            process_timeout: None,
            speech_command: vec!["true".into()],
            music_command: vec!["true".into()],
            video_command: vec!["true".into()],
            animation_command: vec!["true".into()],
            image_command: vec!["true".into()],
            image_animation_command: vec!["true".into()],
            caption_command: vec!["true".into()],
        };

        let jobs: Arc<StdMutex<Vec<GenerationJob>>> = Arc::default();
        let renders: Arc<StdMutex<Vec<RenderInvocation>>> = Arc::default();
        let caption_calls: Arc<AtomicUsize> = Arc::default();

        let registry = Arc::new(ModelRegistry::new());
        if self.initialized {
            let generators: HashMap<ModelKind, Box<dyn Generator>> = ModelKind::generators()
                .iter()
                .map(|&kind| {
                    (
                        kind,
                        Box::new(StubGenerator {
                            behavior: self.generator.clone(),
                            jobs: Arc::clone(&jobs),
                        }) as Box<dyn Generator>,
                    )
                })
                .collect();
            let captioner = Box::new(StubCaptioner {
                caption: self.caption.clone(),
                calls: Arc::clone(&caption_calls),
            });
            registry
                .initialize_with(generators, captioner)
                .expect("initialize stub registry");
        }

        let renderer = Arc::new(StubRenderer {
            exit_code: self.renderer_exit,
            stderr: self.renderer_stderr.clone(),
            writes_output: self.renderer_writes,
            renders: Arc::clone(&renders),
        });

        let state = AppState::new(config.clone(), engine, registry, renderer);
        for dir in state.store.directories() {
            std::fs::create_dir_all(dir).expect("create artifact directory");
        }

        Harness {
            app: build_app_router(state, &config),
            jobs,
            renders,
            caption_calls,
            root,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::default().build()
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// A minimal valid PNG upload.
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode test png");
    buf.into_inner()
}

/// Encode text fields plus an optional `file` part as a multipart body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"input.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_form(
    app: &Router,
    path: &str,
    fields: &[(&str, &str)],
    file: Option<&[u8]>,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .expect("build request");
    app.clone().oneshot(request).await.expect("send request")
}

pub async fn get(app: &Router, path: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("build request");
    app.clone().oneshot(request).await.expect("send request")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("parse json body")
}
