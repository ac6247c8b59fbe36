use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyline_api::config::ServerConfig;
use storyline_api::playback::PlaybackRegistry;
use storyline_api::router::build_app_router;
use storyline_api::state::AppState;
use storyline_core::store::ProjectStore;
use storyline_db::{JsonFileRepository, ProjectArchive};
use storyline_events::{EventBus, EventLog};
use storyline_pipeline::{
    HttpMediaGenerator, MediaGenerator, StoryboardPipeline, UnconfiguredGenerator,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let event_log = EventLog::default();
    let log_handle = tokio::spawn(event_log.clone().run(event_bus.subscribe()));
    tracing::info!("Event bus created");

    // --- Persistence ---
    let repo = Arc::new(JsonFileRepository::new(config.projects_file.clone()));
    let archive = Arc::new(ProjectArchive::new(repo).with_event_bus(Arc::clone(&event_bus)));
    archive.subscribe(|projects| {
        let scenes: usize = projects
            .iter()
            .flat_map(|p| &p.stories)
            .map(|s| s.scenes.len())
            .sum();
        tracing::debug!(projects = projects.len(), scenes, "Project tree written");
    });

    let projects = archive
        .load_projects()
        .await
        .expect("Failed to load project file");
    tracing::info!(
        path = %config.projects_file.display(),
        count = projects.len(),
        "Loaded projects"
    );
    let store = Arc::new(Mutex::new(ProjectStore::new(projects)));

    // --- Generation service ---
    let generator: Arc<dyn MediaGenerator> = match &config.generation_api_url {
        Some(url) => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .expect("Failed to build HTTP client");
            tracing::info!(%url, "Generation service configured");
            Arc::new(HttpMediaGenerator::with_client(client, url.clone()))
        }
        None => {
            tracing::warn!("GENERATION_API_URL not set, media generation disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    // --- Storyboard pipeline ---
    let storyboard = StoryboardPipeline::new(Arc::clone(&store))
        .with_event_bus(Arc::clone(&event_bus))
        .with_step_delay(Duration::from_millis(config.batch_step_delay_ms));

    // --- App state ---
    let playback = Arc::new(PlaybackRegistry::new());
    let state = AppState {
        store: Arc::clone(&store),
        archive: Arc::clone(&archive),
        generator,
        storyboard,
        playback: Arc::clone(&playback),
        event_bus: Arc::clone(&event_bus),
        event_log,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    playback.close_all().await;
    tracing::info!("Playback sessions closed");

    // Background storyboard runs may still hold unsaved scenes.
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let save = async {
        let store = store.lock().await;
        archive.save_projects(store.projects()).await
    };
    match tokio::time::timeout(grace, save).await {
        Ok(Ok(())) => tracing::info!("Final project save complete"),
        Ok(Err(e)) => tracing::error!(error = %e, "Final project save failed"),
        Err(_) => tracing::error!("Final project save timed out"),
    }

    // Dropping the last bus handle closes the channel and stops the log.
    drop(archive);
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), log_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
