//! Violet Community Blog Backend
//!
//! A REST backend serving the merged local/provider post catalog, threaded
//! comments, notifications, moderation reports, and favorites, with
//! per-store snapshot persistence in SQLite.

mod api;
mod config;
mod errors;
mod models;
mod provider;
mod storage;
mod stores;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use provider::ContentProvider;
use storage::SlotStore;
use stores::{
    CommentStore, ContentStore, FavoriteStore, IdentityStore, MillisSequencer, NotificationStore,
    ReportStore,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityStore>,
    pub content: Arc<ContentStore>,
    pub comments: Arc<CommentStore>,
    pub favorites: Arc<FavoriteStore>,
    pub notifications: Arc<NotificationStore>,
    pub reports: Arc<ReportStore>,
    pub provider: Arc<ContentProvider>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Violet Community Blog Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    if config.provider_enabled() {
        tracing::info!("Content provider: {}", config.provider_url);
    } else {
        tracing::warn!("No content provider configured (VIOLET_PROVIDER_URL). Serving local data only.");
    }

    // Initialize storage and restore the store snapshots
    let pool = storage::init_database(&config.db_path).await?;
    let slots = SlotStore::new(pool);
    let seq = Arc::new(MillisSequencer::new());

    let identity = Arc::new(IdentityStore::open(slots.clone(), &config.admin_email).await?);
    let content = Arc::new(ContentStore::open(slots.clone(), seq.clone()).await?);
    let comments = Arc::new(CommentStore::open(slots.clone(), seq.clone()).await?);
    let favorites = Arc::new(FavoriteStore::open(slots.clone()).await?);
    let notifications = Arc::new(NotificationStore::open(slots.clone()).await?);
    let reports = Arc::new(ReportStore::open(slots, seq).await?);

    // Merge the provider's seed content into the persisted posts
    let provider = Arc::new(ContentProvider::new(&config)?);
    content.initialize(provider.fetch_bootstrap().await).await?;

    // Create application state
    let state = AppState {
        identity,
        content,
        comments,
        favorites,
        notifications,
        reports,
        provider,
        config: Arc::new(config.clone()),
    };

    // Build router
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

    // API routes
    let api_routes = Router::new()
        // Session
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout))
        .route("/auth/session", get(api::get_session))
        // Posts
        .route("/posts", get(api::list_posts))
        .route("/posts", post(api::create_post))
        .route("/posts/{id}", get(api::get_post))
        .route("/posts/{id}", put(api::update_post))
        .route("/posts/{id}", delete(api::delete_post))
        .route("/posts/{id}/comments", get(api::list_post_comments))
        .route("/posts/{id}/comments", post(api::create_comment))
        .route("/posts/{id}/favorite", post(api::toggle_favorite))
        .route("/authors", get(api::list_authors))
        .route("/categories", get(api::list_categories))
        // Comments
        .route("/comments/{id}", put(api::update_comment))
        .route("/comments/{id}", delete(api::delete_comment))
        .route("/comments/{id}/replies", post(api::create_reply))
        .route("/comments/{id}/like", post(api::like_comment))
        .route("/comments/{id}/dislike", post(api::dislike_comment))
        // Profile
        .route("/me/posts", get(api::my_posts))
        .route("/me/comments", get(api::my_comments))
        .route("/me/favorites", get(api::my_favorites))
        // Notifications
        .route("/notifications", get(api::list_notifications))
        .route("/notifications", delete(api::clear_notifications))
        .route("/notifications/unread-count", get(api::unread_count))
        .route("/notifications/{id}/read", post(api::mark_notification_read))
        // Reports
        .route("/reports", post(api::create_report))
        .route("/reports/pending", get(api::list_pending_reports))
        .route("/reports/{id}/review", post(api::review_report))
        // Users
        .route("/users", get(api::list_users))
        .route("/users/{email}/promote", post(api::promote_user))
        .route("/users/{email}/demote", post(api::demote_user))
        .route("/users/{email}/block", post(api::block_user))
        .route("/users/{email}/unblock", post(api::unblock_user));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
