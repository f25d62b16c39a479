mod common;

use axum::http::{header, StatusCode};

use common::{
    body_bytes, body_json, harness, post_form, tiny_png, HarnessBuilder, RENDERED_BYTES,
    STUB_CAPTION,
};

#[tokio::test]
async fn text2img_applies_documented_defaults() {
    let h = harness();
    let response = post_form(&h.app, "/text2img/", &[("prompt", "a red cube")], None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let job = h.last_job();
    assert_eq!(job.prompt, "a red cube");
    assert_eq!(job.height, Some(512));
    assert_eq!(job.width, Some(512));
    assert_eq!(job.steps, Some(50));
    assert_eq!(job.guidance_scale, Some(3.5));
    assert_eq!(job.seed, None);
}

#[tokio::test]
async fn text2img_honors_the_steps_field() {
    let h = harness();
    let response = post_form(
        &h.app,
        "/text2img/",
        &[("prompt", "a red cube"), ("steps", "5")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.last_job().steps, Some(5));
}

#[tokio::test]
async fn text2img_rejects_dimensions_off_the_grid() {
    let h = harness();
    let response = post_form(
        &h.app,
        "/text2img/",
        &[("prompt", "a red cube"), ("height", "500")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("multiple of 8"));
}

#[tokio::test]
async fn img2img_renders_through_the_external_renderer() {
    let h = harness();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2img/", &[("prompt", "make it night")], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, RENDERED_BYTES);

    let invocation = h.last_render();
    assert!(invocation
        .model
        .to_string_lossy()
        .ends_with("v1-5-pruned-emaonly.safetensors"));
    // Caller prompt first, caption appended.
    assert_eq!(invocation.prompt, format!("make it night {STUB_CAPTION}"));
    assert_eq!(invocation.negative_prompt, "unrealistic, blurry");
    assert_eq!(invocation.strength, Some(0.4));
    assert_eq!(invocation.steps, Some(50));
    assert_eq!(invocation.height, 512);
    assert_eq!(invocation.width, 512);
    assert!(invocation.lora_model_dir.is_none());
    assert!(invocation.vae.is_none());
}

#[tokio::test]
async fn img2img_honors_negative_prompt_and_strength() {
    let h = harness();
    let png = tiny_png();
    let response = post_form(
        &h.app,
        "/img2img/",
        &[
            ("prompt", "make it night"),
            ("negative_prompt", "daylight"),
            ("strength", "0.8"),
        ],
        Some(&png),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let invocation = h.last_render();
    assert_eq!(invocation.negative_prompt, "daylight");
    assert_eq!(invocation.strength, Some(0.8));
}

#[tokio::test]
async fn img2img_honors_the_steps_field() {
    let h = harness();
    let png = tiny_png();
    let response = post_form(
        &h.app,
        "/img2img/",
        &[("prompt", "make it night"), ("steps", "5")],
        Some(&png),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.last_render().steps, Some(5));
}

#[tokio::test]
async fn img2img_surfaces_renderer_failure() {
    let h = HarnessBuilder::default()
        .renderer_fails(3, "model load failed")
        .build();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2img/", &[("prompt", "x")], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["code"], "GENERATION_FAILED");
    assert!(body["error"].as_str().unwrap().contains("model load failed"));
}

#[tokio::test]
async fn img2img_without_output_file_is_artifact_missing() {
    let h = HarnessBuilder::default().renderer_skips_write().build();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2img/", &[("prompt", "x")], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "ARTIFACT_MISSING");
}

#[tokio::test]
async fn img2img_discards_the_staged_upload_even_on_failure() {
    let h = HarnessBuilder::default()
        .renderer_fails(1, "boom")
        .build();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2img/", &[("prompt", "x")], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let uploads = h.root.path().join("uploads");
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 0);
}
