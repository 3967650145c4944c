use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::{CompanyRepository, DatabaseManager, JobRepository, UserRepository};
use crate::handlers::{auth, companies, jobs, users};
use crate::middleware::{authenticate_jwt, ensure_admin, ensure_correct_user_or_admin};

/// Shared handler state; cloned per request
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub companies: CompanyRepository,
    pub jobs: JobRepository,
    pub users: UserRepository,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            companies: CompanyRepository::new(pool.clone()),
            jobs: JobRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone(), config.security.bcrypt_work_factor),
            pool,
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(admin_routes())
        .merge(user_routes())
        .layer(middleware::from_fn(authenticate_jwt));

    let router = if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
        .route("/companies", get(companies::list))
        .route("/companies/:handle", get(companies::get))
        .route("/jobs", get(jobs::list))
        .route("/jobs/:id", get(jobs::get))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", post(companies::create))
        .route(
            "/companies/:handle",
            patch(companies::update).delete(companies::remove),
        )
        .route("/jobs", post(jobs::create))
        .route("/jobs/:id", patch(jobs::update).delete(jobs::remove))
        .route("/users", post(users::create).get(users::list))
        .route_layer(middleware::from_fn(ensure_admin))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:username",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route("/users/:username/jobs/:id", post(users::apply))
        .route_layer(middleware::from_fn(ensure_correct_user_or_admin))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth/token, /auth/register (public)",
                "companies": "/companies[/:handle] (read public, write admin)",
                "jobs": "/jobs[/:id] (read public, write admin)",
                "users": "/users (admin), /users/:username[/jobs/:id] (same user or admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}
