//! Route registration.

pub mod docs;
pub mod health;

use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::Router;

use cre8_core::style::builtin_profiles;

use crate::handlers;
use crate::state::AppState;

/// Build the full route tree. The style routes are registered from the
/// built-in profile table, all sharing one handler.
pub fn app_routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(docs::root))
        .route("/docs", get(docs::index))
        .route("/health", get(health::health))
        .route("/text2speech/", post(handlers::audio::text2speech))
        .route("/text2music/", post(handlers::audio::text2music))
        .route("/text2video/", post(handlers::video::text2video))
        .route("/text2animation/", post(handlers::animation::text2animation))
        .route("/text2img/", post(handlers::image::text2img))
        .route("/img2img/", post(handlers::image::img2img))
        .route("/img2animation/", post(handlers::animation::img2animation))
        .route("/img2sound/", post(handlers::audio::img2sound));

    for profile in builtin_profiles() {
        router = router.route(
            profile.route,
            post(move |state: State<AppState>, multipart: Multipart| {
                handlers::style::transform(state, profile, multipart)
            }),
        );
    }

    router
}
