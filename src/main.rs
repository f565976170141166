use std::sync::{Arc, Mutex};

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use guidepost::config::AppConfig;
use guidepost::db;
use guidepost::handlers;
use guidepost::services::verification::VerificationStore;
use guidepost::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    std::fs::create_dir_all(&config.uploads_dir)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        verification: Mutex::new(VerificationStore::new()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route(
            "/api/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route("/api/reset-password", post(handlers::auth::reset_password))
        .route("/api/spots", get(handlers::spots::list_spots))
        .route("/api/spots", post(handlers::spots::create_spot))
        .route("/api/spots/:id", delete(handlers::spots::delete_spot))
        .route("/api/guides", get(handlers::guides::list_guides))
        .route("/api/guide-profile", get(handlers::guides::get_profile))
        .route("/api/guide-profile", post(handlers::guides::update_profile))
        .route("/api/book", post(handlers::bookings::create_booking))
        .route(
            "/api/booking-status",
            put(handlers::bookings::update_status),
        )
        .route(
            "/api/complete-trip",
            post(handlers::bookings::complete_trip),
        )
        .route(
            "/api/tourist-bookings",
            get(handlers::bookings::tourist_bookings),
        )
        .route(
            "/api/guide-bookings",
            get(handlers::bookings::guide_bookings),
        )
        .route("/api/feedback", post(handlers::feedback::submit_feedback))
        .route("/api/view-feedback", get(handlers::feedback::view_feedback))
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
