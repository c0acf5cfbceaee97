//! FARMLAND Site Backend
//!
//! Serves the brochure site's content and the password-gated editing panel,
//! persisting both documents in a local SQLite file.

mod api;
mod auth;
mod config;
mod contact;
mod db;
mod errors;
mod models;
mod site;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{AdminSessions, KnockRegistry};
use config::{Config, LogFormat};
use contact::ContactRelay;
use db::ContentStore;
use site::SiteService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteService>,
    pub sessions: Arc<AdminSessions>,
    pub knocks: Arc<KnockRegistry>,
    pub contact: ContactRelay,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting FARMLAND site backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Contact endpoint: {}", config.contact_endpoint);
    match &config.static_dir {
        Some(dir) => tracing::info!("Serving front end from {:?}", dir),
        None => tracing::info!("No static directory configured; API only"),
    }

    // Initialize content store and load documents
    let pool = db::init_database(&config.db_path).await?;
    let site = Arc::new(SiteService::open(ContentStore::new(pool)).await);

    let contact = ContactRelay::new(config.contact_endpoint.clone(), config.contact_timeout)?;

    let state = AppState {
        site,
        sessions: Arc::new(AdminSessions::new(config.session_ttl)),
        knocks: Arc::new(KnockRegistry::new(config.knock_window)),
        contact,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let sessions = state.sessions.clone();
    let static_dir = state.config.static_dir.clone();

    // Admin routes (session required)
    let admin_routes = Router::new()
        .route("/admin/config", get(api::get_admin_config))
        .route("/admin/config/fields/{name}", put(api::update_config_field))
        .route(
            "/admin/config/images/{field}",
            put(api::upload_config_image).layer(DefaultBodyLimit::disable()),
        )
        .route("/admin/password", put(api::change_password))
        .route("/admin/posts", post(api::create_post))
        .route("/admin/posts/{id}", delete(api::delete_post))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_session_layer(sessions.clone(), req, next)
        }));

    // Public routes
    let api_routes = Router::new()
        .route("/site", get(api::get_site))
        .route("/site/config", get(api::get_public_config))
        .route("/posts", get(api::list_posts))
        .route("/revision", get(api::get_revision))
        .route("/events", get(api::content_events))
        .route("/contact", post(api::submit_contact))
        .route("/admin/knock", post(api::knock))
        .route(
            "/admin/session",
            post(api::open_session).delete(api::close_session),
        )
        .merge(admin_routes);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new().nest("/api", api_routes).merge(health_routes);

    // Built front end, if configured
    if let Some(dir) = static_dir {
        router =
            router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
