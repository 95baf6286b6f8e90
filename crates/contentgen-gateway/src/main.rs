//! Content generator gateway: `POST /generate` JSON API plus the server-rendered form at `/`.
//! Config-driven via `GeneratorConfig`; provider key from `SILICONFLOW_API_KEY` (.env honored).

mod handlers;
mod sessions;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use contentgen_core::{GeneratorConfig, PromptDispatcher};
use sessions::SessionStore;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GeneratorConfig>,
    pub dispatcher: Arc<PromptDispatcher>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Arc<GeneratorConfig>, dispatcher: Arc<PromptDispatcher>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.max_sessions, config.history_limit));
        Self {
            config,
            dispatcher,
            sessions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env before anything reads the environment.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[contentgen] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(GeneratorConfig::load()?);
    if config.api_key.is_none() {
        tracing::warn!("SILICONFLOW_API_KEY is not set; /generate will answer 500 until it is configured");
    }

    let dispatcher = Arc::new(PromptDispatcher::from_config(Arc::clone(&config)));
    let state = AppState::new(Arc::clone(&config), dispatcher);
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        model = %config.model,
        environment = %config.environment,
        "content generator listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    // Browser clients served from other local ports may call the JSON API.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            s.starts_with("http://localhost:") || s.starts_with("http://127.0.0.1:")
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(health))
        .route("/", get(handlers::ui::index).post(handlers::ui::submit))
        .route("/generate", post(handlers::api::generate))
        .with_state(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(log_requests))
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = std::time::Instant::now();
    let response = next.run(request).await;
    tracing::debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}
