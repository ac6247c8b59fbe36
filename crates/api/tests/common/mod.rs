#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

use storyline_api::config::ServerConfig;
use storyline_api::playback::PlaybackRegistry;
use storyline_api::router::build_app_router;
use storyline_api::state::AppState;
use storyline_core::store::ProjectStore;
use storyline_db::{JsonFileRepository, ProjectArchive};
use storyline_events::{EventBus, EventLog};
use storyline_pipeline::{GenerationError, MediaGenerator, StoryboardPipeline};

/// Build a test `ServerConfig` with safe defaults and no batch pauses.
pub fn test_config(projects_file: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        projects_file,
        generation_api_url: None,
        generation_service_id: "test-service".to_string(),
        batch_step_delay_ms: 0,
    }
}

/// Generator returning deterministic URLs, or failing every call.
pub struct StubGenerator {
    pub fail: bool,
}

#[async_trait]
impl MediaGenerator for StubGenerator {
    async fn generate_image(
        &self,
        _prompt: &str,
        service_id: &str,
    ) -> Result<String, GenerationError> {
        if self.fail {
            return Err(GenerationError::Api {
                status: 500,
                body: "model crashed".to_string(),
            });
        }
        Ok(format!("https://cdn.test/{service_id}/image.png"))
    }

    async fn generate_video(
        &self,
        image_url: &str,
        _prompt: &str,
        _service_id: &str,
    ) -> Result<String, GenerationError> {
        if self.fail {
            return Err(GenerationError::MissingUrl);
        }
        Ok(image_url.replace(".png", ".mp4"))
    }
}

/// A running application backed by a temporary project file.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn projects_file(&self) -> PathBuf {
        self.dir.path().join("projects.json")
    }
}

/// Build the full application with the production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(StubGenerator { fail: false }))
}

pub fn build_test_app_with(generator: Arc<dyn MediaGenerator>) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path().join("projects.json"));

    let event_bus = Arc::new(EventBus::default());
    let event_log = EventLog::default();
    tokio::spawn(event_log.clone().run(event_bus.subscribe()));

    let repo = Arc::new(JsonFileRepository::new(config.projects_file.clone()));
    let archive = Arc::new(ProjectArchive::new(repo).with_event_bus(Arc::clone(&event_bus)));
    let store = Arc::new(Mutex::new(ProjectStore::default()));
    let storyboard = StoryboardPipeline::new(Arc::clone(&store))
        .with_event_bus(Arc::clone(&event_bus))
        .with_step_delay(std::time::Duration::ZERO);

    let state = AppState {
        store,
        archive,
        generator,
        storyboard,
        playback: Arc::new(PlaybackRegistry::new()),
        event_bus,
        event_log,
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Dispatch an action and return the parsed `data` object.
pub async fn dispatch(app: Router, action: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/v1/projects/actions", action).await;
    assert!(
        response.status().is_success(),
        "dispatch failed with {}",
        response.status()
    );
    body_json(response).await["data"].clone()
}

/// Seed project `p1` with story `s1` holding scenes `a`, `b`, `c` of the
/// given durations.
pub async fn seed_story(app: &Router, durations: [u32; 3]) {
    dispatch(
        app.clone(),
        serde_json::json!({"type": "ADD_PROJECT", "payload": {"id": "p1", "name": "Demo"}}),
    )
    .await;
    dispatch(
        app.clone(),
        serde_json::json!({
            "type": "ADD_STORY",
            "payload": {"projectId": "p1", "id": "s1", "title": "Opening"}
        }),
    )
    .await;
    for (id, duration) in ["a", "b", "c"].into_iter().zip(durations) {
        dispatch(
            app.clone(),
            serde_json::json!({
                "type": "ADD_SCENE",
                "payload": {
                    "projectId": "p1",
                    "storyId": "s1",
                    "id": id,
                    "description": format!("Scene {id}"),
                    "durationInSeconds": duration
                }
            }),
        )
        .await;
    }
}
