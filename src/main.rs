mod models;
mod service;
mod config;
mod dtos;
mod error;
mod db;
mod utils;
mod middleware;
mod mail;
mod handler;
mod routes;

use std::sync::Arc;

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use db::DBClient;
use dotenv::dotenv;
use middleware::rate_limit::{login_rate_limiter, RateLimiter};
use routes::create_router;
use service::session::{SessionEvent, SessionStore};
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: DBClient,
    pub sessions: Arc<SessionStore>,
    pub login_limiter: RateLimiter,
}

/// Logs logins and logouts as they happen.
fn spawn_session_logger(sessions: &SessionStore) {
    let mut events = sessions.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::LoggedIn { session_id, role }) => {
                    tracing::info!("Session {} opened ({})", session_id, role.to_str());
                }
                Ok(SessionEvent::LoggedOut { session_id, role }) => {
                    tracing::info!("Session {} closed ({})", session_id, role.to_str());
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Session logger skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
    .with_max_level(LevelFilter::DEBUG)
    .init();

    dotenv().ok();

    let config = Config::init();

    let allowed_origins = match [config.app_url.as_str(), "http://localhost:5173"]
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(origins) => origins,
        Err(err) => {
            tracing::error!("Invalid APP_URL {}: {}", config.app_url, err);
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let sessions = Arc::new(SessionStore::new(config.jwt_maxage));
    spawn_session_logger(&sessions);
    sessions.clone().start_cleanup_task();

    let app_state = AppState {
        env: config.clone(),
        db_client: DBClient::with_fixtures(),
        sessions,
        login_limiter: login_rate_limiter(),
    };

    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
