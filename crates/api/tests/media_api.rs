//! HTTP-level tests for scene image and video generation.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post_json, seed_story, StubGenerator};
use serde_json::json;
use storyline_pipeline::UnconfiguredGenerator;

const IMAGE: &str = "/api/v1/projects/p1/stories/s1/scenes/a/image";
const VIDEO: &str = "/api/v1/projects/p1/stories/s1/scenes/a/video";

#[tokio::test]
async fn image_uses_configured_service_by_default() {
    let test = common::build_test_app();
    seed_story(&test.app(), [5, 5, 5]).await;

    let response = post_json(test.app(), IMAGE, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "a");
    assert_eq!(json["data"]["imageUrl"], "https://cdn.test/test-service/image.png");

    let saved = test.state.archive.load_projects().await.unwrap();
    assert_eq!(
        saved[0].stories[0].scenes[0].image_url.as_deref(),
        Some("https://cdn.test/test-service/image.png")
    );
}

#[tokio::test]
async fn image_honours_requested_service() {
    let test = common::build_test_app();
    seed_story(&test.app(), [5, 5, 5]).await;

    let json = body_json(post_json(test.app(), IMAGE, json!({"serviceId": "flux"})).await).await;
    assert_eq!(json["data"]["imageUrl"], "https://cdn.test/flux/image.png");
}

#[tokio::test]
async fn video_follows_image() {
    let test = common::build_test_app();
    seed_story(&test.app(), [5, 5, 5]).await;

    let response = post_json(test.app(), VIDEO, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    post_json(test.app(), IMAGE, json!({})).await;
    let json = body_json(post_json(test.app(), VIDEO, json!({})).await).await;
    assert_eq!(json["data"]["videoUrl"], "https://cdn.test/test-service/image.mp4");
}

#[tokio::test]
async fn failed_generation_leaves_scene_untouched() {
    let test = common::build_test_app_with(Arc::new(StubGenerator { fail: true }));
    seed_story(&test.app(), [5, 5, 5]).await;
    let before = test.state.store.lock().await.projects().to_vec();

    let response = post_json(test.app(), IMAGE, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GENERATION_FAILED");

    assert_eq!(test.state.store.lock().await.projects(), before.as_slice());
}

#[tokio::test]
async fn unconfigured_generator_is_unavailable() {
    let test = common::build_test_app_with(Arc::new(UnconfiguredGenerator));
    seed_story(&test.app(), [5, 5, 5]).await;

    let response = post_json(test.app(), IMAGE, json!({})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "GENERATION_UNAVAILABLE");
}

#[tokio::test]
async fn unknown_scene_is_not_found() {
    let test = common::build_test_app();
    seed_story(&test.app(), [5, 5, 5]).await;

    let response = post_json(
        test.app(),
        "/api/v1/projects/p1/stories/s1/scenes/zzz/image",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
