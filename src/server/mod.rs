//! HTTP surface: routes, middleware stack and the listening loop.

pub mod auth;
pub mod handlers;
pub mod rate_limit;

pub use rate_limit::RateLimiter;

use crate::app::App;
use crate::config::Config;
use crate::models::ErrorBody;
use crate::response::SERVER_ERROR;
use crate::upload::MAX_UPLOAD_BYTES;
use crate::{Error, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Room for multipart framing and the `message` field on top of the image.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(app: Arc<App>, api_key: Option<String>) -> Self {
        Self {
            app,
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Build the full router. Layers run outermost first: panic boundary,
/// tracing, CORS, rate limiting, then the routes.
pub fn router(state: AppState, limiter: Arc<RateLimiter>, cors_origin: &str) -> Result<Router> {
    let ai_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/analyze-image", post(handlers::analyze_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let router = Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/ai", ai_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::limit_by_ip,
        ))
        .layer(cors_layer(cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic));

    Ok(router)
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| Error::Config(format!("Invalid CORS_ORIGIN '{}': {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(auth::API_KEY_HEADER),
        ]))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!("Server error: handler panicked: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(SERVER_ERROR).with_message(message)),
    )
        .into_response()
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: Config) -> Result<()> {
    let app = Arc::new(App::new(&config));
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let state = AppState::new(app, config.api_key.clone());
    let router = router(state, limiter.clone(), &config.cors_origin)?;

    if config.api_key.is_some() {
        info!("X-API-Key required on /api/ai/*");
    }
    info!(
        "Rate limit: {} requests per {}s per client",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs()
    );

    let prune_every = config.rate_limit.window.max(std::time::Duration::from_secs(1));
    let pruner = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(prune_every);
        loop {
            interval.tick().await;
            pruner.prune();
        }
    });

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("AI backend running on http://{}", addr);
    info!("Available endpoints:");
    info!("   - GET  /api/health");
    info!("   - POST /api/ai/chat");
    info!("   - POST /api/ai/analyze-image");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, waiting for in-flight requests");
}
