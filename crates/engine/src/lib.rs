//! Generation engine for the Cre8 media service.
//!
//! Owns the long-lived model registry, the capability traits and their
//! command-backed production implementations, the caption bridge, and the
//! external renderer adapter. All heavyweight model work happens out of
//! process; this crate's job is acquire-once/reuse-many handle management
//! and disciplined child-process execution.

pub mod capability;
pub mod caption;
pub mod config;
pub mod registry;
pub mod renderer;
pub mod subprocess;
