// src/main.rs

use std::{net::SocketAddr, sync::Arc};

use dotenvy::dotenv;
use mocktest::config::Config;
use mocktest::history::{BlobHistory, FileBlobStore};
use mocktest::llm::GeminiClient;
use mocktest::routes;
use mocktest::services::quiz::QuizService;
use mocktest::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Refuse to start without an API key
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "mocktest.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let generator = GeminiClient::new(reqwest::Client::new(), &config);
    tracing::info!(
        "Using model {} (timeout {}s)",
        config.gemini_model,
        config.request_timeout_secs
    );

    let history = BlobHistory::new(FileBlobStore::new(&config.history_dir));
    tracing::info!("Saved tests are kept in {}", config.history_dir.display());

    let state = AppState {
        quiz: QuizService::new(Arc::new(generator)),
        history: Arc::new(history),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Backend running at http://localhost:{}", config.port);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
