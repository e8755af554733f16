//! NeonSki Backend
//!
//! REST backend for the NeonSki ski-trip planner with SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod planner;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NeonSki Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(enabled = config.seed_demo_data, "Demo resort seeding");

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (NEONSKI_API_PSK). Authentication is disabled!");
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Planner pages
        .route("/session", get(api::get_session))
        .route("/me", get(api::get_profile).put(api::update_profile))
        .route("/me/avatar", post(api::regenerate_avatar))
        .route("/my-adventures", get(api::my_adventures))
        .route("/plan", get(api::get_plan_form).post(api::plan_adventure))
        // Resorts
        .route("/resorts", get(api::list_resorts).post(api::create_resort))
        .route(
            "/resorts/{id}",
            get(api::get_resort)
                .put(api::update_resort)
                .delete(api::delete_resort),
        )
        // Users
        .route("/users", get(api::list_users).post(api::create_user))
        .route(
            "/users/{id}",
            get(api::get_user)
                .put(api::update_user)
                .delete(api::delete_user),
        )
        // Adventures
        .route(
            "/adventures",
            get(api::list_adventures).post(api::create_adventure),
        )
        .route(
            "/adventures/{id}",
            get(api::get_adventure)
                .put(api::update_adventure)
                .delete(api::delete_adventure),
        )
        // Activities
        .route(
            "/activities",
            get(api::list_activities).post(api::create_activity),
        )
        .route(
            "/activities/{id}",
            get(api::get_activity)
                .put(api::update_activity)
                .delete(api::delete_activity),
        )
        // Participants
        .route(
            "/participants",
            get(api::list_participants).post(api::create_participant),
        )
        .route(
            "/participants/{id}",
            get(api::get_participant)
                .put(api::update_participant)
                .delete(api::delete_participant),
        )
        // Gear
        .route("/gear", get(api::list_gear).post(api::create_gear))
        .route(
            "/gear/{id}",
            get(api::get_gear)
                .put(api::update_gear)
                .delete(api::delete_gear),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint. Fails when the database is unreachable.
async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.repo.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}

#[cfg(test)]
mod tests;
