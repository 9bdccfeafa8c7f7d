/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware.
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session resolution (router-wide; attaches CurrentUser to every request)
///
/// The session resolver never rejects a request. Handlers that need an
/// authenticated caller read the resolved [`CurrentUser`] from extensions
/// and decide for themselves; the ownership guard runs inside the mutation
/// handlers.
///
/// # Example
///
/// ```no_run
/// use inkpost_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use inkpost_shared::auth::session::session_resolver;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// The process-wide token-signing secret
    pub fn token_secret(&self) -> &str {
        &self.config.auth.token_secret
    }
}

/// Builds the complete axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register     # Create account, issue session cookie
///     │   ├── POST /login        # Verify credentials, issue session cookie
///     │   ├── POST /logout       # Clear session cookie
///     │   └── GET  /me           # Resolved identity's profile
///     └── /posts/
///         ├── POST   /           # Create post (authenticated)
///         ├── GET    /           # List posts (public)
///         ├── GET    /:id        # Read post (public)
///         ├── PUT    /:id        # Update post (owner only)
///         └── DELETE /:id        # Delete post (owner only)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me));

    let post_routes = Router::new()
        .route(
            "/",
            post(routes::posts::create_post).get(routes::posts::list_posts),
        )
        .route(
            "/:id",
            get(routes::posts::get_post)
                .put(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        );

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        // Every request resolves its identity exactly once, before handlers run
        .layer(middleware::from_fn(session_resolver(
            state.token_secret().to_string(),
        )))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
