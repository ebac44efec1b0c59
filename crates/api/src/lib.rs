//! # Bookit API
//!
//! HTTP server for the experience booking marketplace: catalog browsing,
//! checkout with promo codes, and the admin endpoints that manage experiences,
//! slots, bookings and promos.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths per resource
//! - **Handlers**: request validation and calls into the [`Store`]
//! - **Middleware**: admin guard and error-to-response mapping
//! - **Config**: environment-driven settings
//!
//! Handlers only see `Arc<dyn Store>`, so the same router runs over
//! PostgreSQL in production and the in-memory store in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Admin authentication and error handling
pub mod middleware;
/// Route definitions
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use bookit_db::Store;
use eyre::Result;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub store: Arc<dyn Store>,
    /// Bearer token for admin endpoints; `None` leaves them open
    pub admin_api_key: Option<String>,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, admin_api_key: Option<String>) -> Self {
        Self {
            store,
            admin_api_key,
        }
    }
}

/// Installs the global fmt subscriber at `level`.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// All endpoints with state attached, without transport layers.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Catalog and slot management
        .merge(routes::experience::routes())
        // Checkout and booking administration
        .merge(routes::booking::routes())
        // Promo codes
        .merge(routes::promo::routes())
        .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

/// Router plus CORS, request tracing and the request timeout.
pub fn app(config: &config::ApiConfig, state: Arc<ApiState>) -> Router {
    router(state)
        .layer(cors_layer(config.cors_origins.as_deref()))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(axum::middleware::map_response(
            middleware::error_handling::timeout_error_body,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `config.server_addr()` until the process exits.
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    let state = Arc::new(ApiState::new(store, config.admin_api_key.clone()));
    if state.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY is not set, admin endpoints are open");
    }

    let app = app(&config, state);

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
