/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Router Layout
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /api/v1/
///     ├── /auth/                           # Registration, login, tokens
///     ├── /projects/                       # Project CRUD + members
///     ├── /tasks/:project_id/              # Task CRUD
///     ├── /subtasks/:project_id/           # Subtask CRUD
///     ├── /notes/:project_id/              # Note CRUD
///     └── /admin/                          # Platform-admin analytics
/// ```
///
/// # Middleware Stack
///
/// Outermost to innermost: security headers → CORS → request tracing →
/// JWT authentication (per group) → project authorization (project-scoped
/// groups only) → handler.
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use taskboard_shared::auth::{jwt, middleware::AuthContext};
use taskboard_shared::models::user::User;

use crate::{config::Config, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; `Arc`
/// keeps the clone cheap.
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

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes reachable without a token
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/verify-email/:token", get(routes::auth::verify_email))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/reset-password/:token", post(routes::auth::reset_password));

    // Auth routes for the logged-in account
    let auth_private = Router::new()
        .route("/current-user", get(routes::auth::current_user))
        .route("/change-password", post(routes::auth::change_password))
        .route(
            "/resend-verification",
            post(routes::auth::resend_verification),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Project collection (no :project_id yet, so no project authorization)
    let project_collection = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Everything below a :project_id goes through the project authorization
    // middleware. Layers run outermost-last: jwt first, then project access.
    let project_scoped = Router::new()
        .route(
            "/:project_id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/:project_id/members",
            get(routes::members::list_members).post(routes::members::add_member),
        )
        .route(
            "/:project_id/members/:user_id",
            put(routes::members::update_member_role).delete(routes::members::remove_member),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::project_access::project_access_layer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let task_routes = Router::new()
        .route(
            "/:project_id",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:project_id/t/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::project_access::project_access_layer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let subtask_routes = Router::new()
        .route(
            "/:project_id/t/:task_id/subtasks",
            get(routes::subtasks::list_subtasks).post(routes::subtasks::create_subtask),
        )
        .route(
            "/:project_id/st/:subtask_id",
            put(routes::subtasks::update_subtask).delete(routes::subtasks::delete_subtask),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::project_access::project_access_layer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let note_routes = Router::new()
        .route(
            "/:project_id",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/:project_id/n/:note_id",
            get(routes::notes::get_note)
                .put(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::project_access::project_access_layer,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Platform-admin analytics; the account-level role gate lives in the
    // handlers
    let admin_routes = Router::new()
        .route("/dashboard", get(routes::admin::dashboard))
        .route("/users", get(routes::admin::user_stats))
        .route("/projects", get(routes::admin::project_stats))
        .route("/tasks", get(routes::admin::task_stats))
        .route("/activity", get(routes::admin::recent_activity))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_private))
        .nest("/projects", project_collection.merge(project_scoped))
        .nest("/tasks", task_routes)
        .nest("/subtasks", subtask_routes)
        .nest("/notes", note_routes)
        .nest("/admin", admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
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
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token, loads the account (so bans and role changes
/// take effect immediately), and injects [`AuthContext`] plus the loaded
/// [`User`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    use taskboard_shared::auth::middleware::AuthError;

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)
        .map_err(crate::error::ApiError::from)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::from(AuthError::InvalidFormat(
            "Expected Bearer token".to_string(),
        ))
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| crate::error::ApiError::from(AuthError::UnknownUser))?;

    if user.banned {
        return Err(AuthError::Banned.into());
    }

    let auth_context = AuthContext::new(user.id, user.role);

    req.extensions_mut().insert(auth_context);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
