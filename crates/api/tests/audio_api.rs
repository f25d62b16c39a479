mod common;

use axum::http::{header, StatusCode};

use common::{body_bytes, harness, post_form, tiny_png, HarnessBuilder};

#[tokio::test]
async fn text2speech_returns_wav_attachment() {
    let h = harness();
    let response = post_form(&h.app, "/text2speech/", &[("prompt", "hello world")], None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"output.wav\""
    );

    // The stub writes the prompt it received, so the served bytes prove the
    // artifact round-trips from the capability's output file.
    assert_eq!(body_bytes(response).await, b"hello world");

    let job = h.last_job();
    assert_eq!(job.prompt, "hello world");
    assert_eq!(job.duration_secs, None);
}

#[tokio::test]
async fn text2speech_consumes_the_artifact() {
    let h = harness();
    let response = post_form(&h.app, "/text2speech/", &[("prompt", "hello")], None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let dir = h.root.path().join("generated_speech");
    let leftover = std::fs::read_dir(dir).unwrap().count();
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn text2music_defaults_duration_to_ten_seconds() {
    let h = harness();
    let response = post_form(&h.app, "/text2music/", &[("prompt", "slow jazz")], None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.last_job().duration_secs, Some(10));
}

#[tokio::test]
async fn text2music_honors_duration_within_bounds() {
    let h = harness();
    let response = post_form(
        &h.app,
        "/text2music/",
        &[("prompt", "slow jazz"), ("duration", "30")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.last_job().duration_secs, Some(30));

    let response = post_form(
        &h.app,
        "/text2music/",
        &[("prompt", "slow jazz"), ("duration", "61")],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn img2sound_conditions_on_the_caption_alone() {
    let h = HarnessBuilder::default().caption("rain on a tin roof").build();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2sound/", &[], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");

    let job = h.last_job();
    assert_eq!(job.prompt, "rain on a tin roof");
    assert_eq!(job.duration_secs, Some(10));
    assert_eq!(h.caption_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn img2sound_rejects_an_empty_caption() {
    // Conditioning the music capability on empty text would produce
    // unrelated output, so a captioner that yields nothing is a failure.
    let h = HarnessBuilder::default().caption("").build();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2sound/", &[], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(h.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn img2sound_requires_an_upload() {
    let h = harness();
    let response = post_form(&h.app, "/img2sound/", &[], None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.caption_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn img2sound_discards_the_staged_upload() {
    let h = harness();
    let png = tiny_png();
    let response = post_form(&h.app, "/img2sound/", &[], Some(&png)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let uploads = h.root.path().join("uploads");
    assert_eq!(std::fs::read_dir(uploads).unwrap().count(), 0);
}
