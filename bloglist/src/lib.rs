//! Blog listing REST API.
//!
//! Accounts log in with a username and password and receive a bearer token.
//! Creating and deleting blogs needs that token; listing and liking do not.
//!
//! # Endpoints
//!
//! | method | path                 | auth   |
//! |--------|----------------------|--------|
//! | GET    | `/api/blogs`         |        |
//! | GET    | `/api/blogs/:id`     |        |
//! | POST   | `/api/blogs`         | bearer |
//! | PUT    | `/api/blogs/:id`     |        |
//! | DELETE | `/api/blogs/:id`     | bearer |
//! | GET    | `/api/users`         |        |
//! | POST   | `/api/users`         |        |
//! | POST   | `/api/login`         |        |
//! | POST   | `/api/testing/reset` | only with `BLOGLIST_TESTING=true` |
//!
//! Errors are JSON bodies of the form `{"error": "..."}`.
//!
//! # Running
//!
//! ```sh
//! SECRET=changeme BLOGLIST_DATA_FILE=./bloglist.json RUST_LOG=info cargo run -p bloglist
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;

pub use config::Config;
pub use store::{BlogStore, DocumentStore};

use auth::TokenKeys;
use routes::{blogs, login, testing, unknown_endpoint, users};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn BlogStore>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BlogStore>) -> Self {
        let tokens = Arc::new(TokenKeys::new(&config.secret, config.token_ttl));
        Self {
            config: Arc::new(config),
            store,
            tokens,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let mut router = Router::new()
        .route("/api/blogs", get(blogs::list).post(blogs::create))
        .route(
            "/api/blogs/:id",
            get(blogs::get_one).put(blogs::update).delete(blogs::remove),
        )
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/login", post(login::login));

    if state.config.testing {
        router = router.route("/api/testing/reset", post(testing::reset));
    }

    router
        .fallback(unknown_endpoint)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let config = Config::from_env()?;

    let store: Arc<dyn BlogStore> = match &config.data_file {
        Some(path) => Arc::new(
            DocumentStore::open(path)
                .await
                .with_context(|| format!("Failed to open data file {}", path.display()))?,
        ),
        None => {
            warn!("BLOGLIST_DATA_FILE not set, data is kept in memory only");
            Arc::new(DocumentStore::in_memory())
        }
    };
    if config.testing {
        warn!("testing endpoints enabled");
    }

    let address = format!("0.0.0.0:{}", config.port);
    let app = build_router(AppState::new(config, store));

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
