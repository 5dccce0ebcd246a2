/// Application state and router
use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use taskboard_shared::auth::middleware::create_jwt_middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the full router
///
/// ```text
/// GET    /health
/// POST   /v1/auth/{register,login,refresh}
/// GET    /v1/projects                                  POST /v1/projects
/// GET    /v1/projects/:id                              DELETE
/// GET    /v1/projects/:id/memberships                  POST
/// GET    /v1/projects/:id/non-memberships
/// POST   /v1/projects/:id/tasks
/// GET    /v1/projects/:id/tasks/:task_id               PUT, DELETE
/// PUT    /v1/projects/:id/tasks/:task_id/status
/// GET    /v1/analytics/tasks
/// ```
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project).delete(routes::projects::delete_project),
        )
        .route(
            "/:id/memberships",
            get(routes::memberships::list_memberships).post(routes::memberships::add_members),
        )
        .route(
            "/:id/non-memberships",
            get(routes::memberships::list_non_members),
        )
        .route("/:id/tasks", post(routes::tasks::create_task))
        .route(
            "/:id/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:id/tasks/:task_id/status",
            put(routes::tasks::update_task_status),
        );

    let analytics_routes = Router::new().route("/tasks", get(routes::analytics::task_analytics));

    let protected = Router::new()
        .nest("/projects", project_routes)
        .nest("/analytics", analytics_routes)
        .layer(axum::middleware::from_fn(create_jwt_middleware(
            state.jwt_secret().to_string(),
        )));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
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
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
