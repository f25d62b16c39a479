//! Cre8 media API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! router assembly) so integration tests and the binary entrypoint use the
//! exact same stack.

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
