//! Media kinds and artifact path layout.
//!
//! Each supported output kind declares its media type, download filename,
//! and output subdirectory. The [`ArtifactStore`] builds per-request paths
//! from a random token, so two concurrent requests of the same kind never
//! alias each other's output.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Subdirectory for staged uploads, shared by all upload-accepting kinds.
pub const UPLOAD_DIR: &str = "uploads";

/// The kinds of media this service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Speech,
    Music,
    Video,
    Animation,
    Image,
    Sound,
}

impl MediaKind {
    /// MIME type declared on responses of this kind.
    pub fn media_type(&self) -> &'static str {
        match self {
            MediaKind::Speech | MediaKind::Music | MediaKind::Sound => "audio/wav",
            MediaKind::Video => "video/mp4",
            MediaKind::Animation => "image/gif",
            MediaKind::Image => "image/png",
        }
    }

    /// Fixed download filename sent in `Content-Disposition`.
    pub fn file_name(&self) -> &'static str {
        match self {
            MediaKind::Speech | MediaKind::Music | MediaKind::Sound => "output.wav",
            MediaKind::Video => "output.mp4",
            MediaKind::Animation => "animation.gif",
            MediaKind::Image => "output.png",
        }
    }

    /// File extension used for on-disk artifact paths.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Speech | MediaKind::Music | MediaKind::Sound => "wav",
            MediaKind::Video => "mp4",
            MediaKind::Animation => "gif",
            MediaKind::Image => "png",
        }
    }

    /// Output subdirectory under the artifact root.
    pub fn output_dir(&self) -> &'static str {
        match self {
            MediaKind::Speech => "generated_speech",
            MediaKind::Music => "generated_music",
            MediaKind::Video => "generated_videos",
            MediaKind::Animation => "generated_animations",
            MediaKind::Image => "generated_images",
            MediaKind::Sound => "generated_sounds",
        }
    }

    /// All kinds, used at startup to pre-create output directories.
    pub fn all() -> &'static [MediaKind] {
        &[
            MediaKind::Speech,
            MediaKind::Music,
            MediaKind::Video,
            MediaKind::Animation,
            MediaKind::Image,
            MediaKind::Sound,
        ]
    }
}

/// Random token scoping artifact and upload paths to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken(String);

impl RequestToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure path construction for generated artifacts and staged uploads.
///
/// Directory creation and file I/O are the caller's concern; this type only
/// decides where things go.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-request output path for `kind`.
    pub fn artifact_path(&self, kind: MediaKind, token: &RequestToken) -> PathBuf {
        self.root
            .join(kind.output_dir())
            .join(format!("{}.{}", token.as_str(), kind.extension()))
    }

    /// Per-request staging path for an uploaded image.
    pub fn upload_path(&self, token: &RequestToken) -> PathBuf {
        self.root
            .join(UPLOAD_DIR)
            .join(format!("{}.png", token.as_str()))
    }

    /// Directories that must exist before any request is served.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = MediaKind::all()
            .iter()
            .map(|k| self.root.join(k.output_dir()))
            .collect();
        dirs.push(self.root.join(UPLOAD_DIR));
        dirs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
