//! Domain logic for the Cre8 media generation service.
//!
//! Everything in this crate is pure and synchronous: the error taxonomy,
//! media kind metadata, artifact path layout, parameter validation, prompt
//! assembly, style profiles, and external-renderer argument assembly.
//! Process spawning and HTTP concerns live in `cre8-engine` and `cre8-api`.

pub mod error;
pub mod media;
pub mod params;
pub mod prompt;
pub mod renderer;
pub mod style;
