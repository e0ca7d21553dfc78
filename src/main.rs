mod access;
mod broker_store;
mod cache_validator;
mod catalog;
mod circuit_breaker;
mod config;
mod db;
mod enrichment;
mod errors;
mod export;
mod handlers;
mod models;
mod services;
mod stripe_client;
mod webhook_handler;
mod webhook_models;

use axum::{
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection.
/// - Provider response caches and the enrichment circuit breaker.
/// - HTTP routes and middleware (CORS, rate limiting, body size limit).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "microticket_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Place-detail response cache (1 hour TTL, 10k max entries)
    let detail_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(10_000)
        .build();
    tracing::info!("Place details cache initialized (1h TTL, 10k capacity)");

    // Organization response cache (24 hour TTL, 50k max entries)
    // Keyed by hostname; skips the enrichment provider for known domains.
    let org_cache = Cache::builder()
        .time_to_live(Duration::from_secs(86400))
        .max_capacity(50_000)
        .build();
    tracing::info!("Organization cache initialized (24h TTL, 50k capacity)");

    // Circuit breaker shared by all enrichment-provider calls
    let enrichment_breaker = circuit_breaker::create_provider_circuit_breaker();
    tracing::info!("Enrichment provider circuit breaker initialized");

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        db: db.pool.clone(),
        config: config.clone(),
        detail_cache,
        org_cache,
        enrichment_breaker,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        // Prospect search + export
        .route("/api/v1/prospects/search", post(handlers::search_prospects))
        .route("/api/v1/prospects/export", post(handlers::export_prospects))
        // Relay endpoints consumed directly by the UI
        .route("/api/v1/places/:place_id", get(handlers::get_place_details))
        .route(
            "/api/v1/enrichment/organization",
            post(handlers::organization_relay),
        )
        .route(
            "/api/v1/equipment/suggestions",
            get(handlers::equipment_suggestions),
        )
        // Broker accounts + billing
        .route("/api/v1/brokers/signup", post(handlers::broker_signup))
        .route("/api/v1/access/check", post(handlers::access_check))
        .route("/api/v1/billing/checkout", post(handlers::create_checkout))
        // Payment processor webhook
        .route(
            "/api/v1/webhooks/stripe",
            post(webhook_handler::stripe_webhook),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
