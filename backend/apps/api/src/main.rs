//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use chrono::Utc;
use csrf::domain::repository::CsrfTokenRepository;
use csrf::{CsrfConfig, KvTokenRepository, PgTokenRepository, csrf_guard, csrf_router};
use platform::guard::GuardChain;
use platform::headers::security_headers;
use platform::store::MemoryKvStore;
use platform::sweep::SweepCadence;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use throttle::domain::repository::RateLimitStore;
use throttle::{MemoryRateLimitStore, PgRateLimitStore, RatePolicy, rate_limit_guard};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,csrf=info,throttle=info,upload=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cookie_secure = match env::var("COOKIE_SECURE") {
        Ok(value) => value != "false",
        Err(_) => !cfg!(debug_assertions),
    };
    let csrf_config = Arc::new(CsrfConfig {
        cookie_secure,
        ..CsrfConfig::default()
    });

    let cors = build_cors();

    // Store backend: process-local maps for a single instance,
    // PostgreSQL when replicas must share tokens and counters
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string());

    let app = match backend.as_str() {
        "postgres" => {
            let database_url = env::var("DATABASE_URL")
                .context("DATABASE_URL must be set for the postgres store backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            build_app(
                Arc::new(PgTokenRepository::new(pool.clone())),
                Arc::new(PgRateLimitStore::new(pool)),
                csrf_config,
                cors,
            )
        }
        "memory" => {
            tracing::info!("Using in-memory stores (single instance only)");

            build_app(
                Arc::new(KvTokenRepository::new(MemoryKvStore::new())),
                Arc::new(MemoryRateLimitStore::new()),
                csrf_config,
                cors,
            )
        }
        other => anyhow::bail!("Unknown STORE_BACKEND {other:?} (expected memory or postgres)"),
    };

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Assemble the router over any pair of store backends
fn build_app<R, S>(
    csrf_repo: Arc<R>,
    rate_store: Arc<S>,
    csrf_config: Arc<CsrfConfig>,
    cors: CorsLayer,
) -> Router
where
    R: CsrfTokenRepository + Clone + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    spawn_sweep(csrf_repo.clone(), rate_store.clone());

    // Every request passes the general rate limit, then CSRF gating
    let chain = GuardChain::new(vec![
        rate_limit_guard(rate_store.clone(), RatePolicy::api()),
        csrf_guard(csrf_repo.clone(), csrf_config.clone()),
    ]);
    tracing::info!(guards = ?chain.names(), "Guard chain assembled");

    // Uploads get their own tighter budget on top of the general one
    let upload_chain = GuardChain::new(vec![rate_limit_guard(
        rate_store,
        RatePolicy::upload(),
    )]);
    let upload_routes = upload_router_with_guard(upload_chain);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/csrf", csrf_router(csrf_repo, csrf_config))
        .nest("/api/upload", upload_routes)
        .layer(middleware::from_fn(move |req: axum::extract::Request, next: middleware::Next| {
            let chain = chain.clone();
            async move { chain.run(req, next).await }
        }))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn upload_router_with_guard(chain: GuardChain) -> Router {
    upload::upload_router(&upload::UploadConfig::default()).layer(middleware::from_fn(
        move |req: axum::extract::Request, next: middleware::Next| {
            let chain = chain.clone();
            async move { chain.run(req, next).await }
        },
    ))
}

/// Periodic sweep of expired tokens and stale windows
///
/// The first tick fires immediately, doubling as startup cleanup.
/// Sweep failures are logged and retried on the next tick.
fn spawn_sweep<R, S>(csrf_repo: Arc<R>, rate_store: Arc<S>)
where
    R: CsrfTokenRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let Some(every) = SweepCadence::default().interval() else {
        return;
    };

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let now_ms = Utc::now().timestamp_millis();

            match csrf_repo.purge_expired(now_ms).await {
                Ok(purged) if purged > 0 => {
                    tracing::info!(purged, "Swept expired CSRF tokens");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "CSRF token sweep failed"),
            }

            match rate_store.purge_expired(now_ms).await {
                Ok(purged) if purged > 0 => {
                    tracing::info!(purged, "Swept stale rate limit windows");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Rate limit sweep failed"),
            }
        }
    });
}

fn build_cors() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            http::HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
