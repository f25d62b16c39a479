//! API index served at `/docs`, with the root redirecting to it.

use axum::response::Redirect;
use axum::Json;
use serde_json::{json, Value};

use cre8_core::style::builtin_profiles;

/// `GET /`: temporary redirect to the API index.
pub async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

/// `GET /docs`: a machine-readable index of every endpoint.
pub async fn index() -> Json<Value> {
    let mut endpoints = vec![
        json!({"method": "GET", "path": "/health", "description": "Service health and capability readiness"}),
        json!({"method": "POST", "path": "/text2speech/", "description": "Synthesize speech from a prompt"}),
        json!({"method": "POST", "path": "/text2music/", "description": "Compose a music clip from a prompt"}),
        json!({"method": "POST", "path": "/text2video/", "description": "Render a video clip from a prompt"}),
        json!({"method": "POST", "path": "/text2animation/", "description": "Animate a prompt as a GIF"}),
        json!({"method": "POST", "path": "/text2img/", "description": "Render an image from a prompt"}),
        json!({"method": "POST", "path": "/img2img/", "description": "Reimagine an uploaded image guided by a prompt"}),
        json!({"method": "POST", "path": "/img2animation/", "description": "Animate an uploaded image guided by a prompt"}),
        json!({"method": "POST", "path": "/img2sound/", "description": "Sonify an uploaded image"}),
    ];
    for profile in builtin_profiles() {
        endpoints.push(json!({
            "method": "POST",
            "path": profile.route,
            "description": "Apply a fixed artistic style to an uploaded image",
        }));
    }
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}
