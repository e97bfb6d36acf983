/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use usermgmt_api::{app::{build_router, AppState}, config::Config};
/// use usermgmt_shared::db::pool::{create_pool, DatabaseConfig};
/// use usermgmt_shared::repository::PgUserRepository;
/// use usermgmt_shared::service::UserService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let users = UserService::new(Arc::new(PgUserRepository::new(pool)));
/// let app = build_router(AppState::new(users, config));
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::routes;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use usermgmt_shared::service::UserService;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; both fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// User service holding the storage handle
    pub users: UserService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(users: UserService, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/
///     ├── GET    /users
///     ├── POST   /users
///     ├── GET    /users/:id
///     ├── PUT    /users/:id
///     └── DELETE /users/:id
/// ```
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let cors = build_cors(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser front end
///
/// `*` is permissive (no credentials); otherwise only the listed origins are
/// allowed, with credentials.
fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
        .allow_credentials(true)
}
