//! HTTP API for the registration backend.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::auth::AdminSessions;
use crate::export::ExportService;
use crate::registration::RegistrationService;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use registration_store::RecordStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration writes
    pub registrations: RegistrationService,
    /// Date-windowed queries and CSV export
    pub exports: ExportService,
    /// Admin token issuance and verification
    pub sessions: Arc<AdminSessions>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn RecordStore>, sessions: AdminSessions, export_dir: PathBuf) -> Self {
        Self {
            registrations: RegistrationService::new(store.clone()),
            exports: ExportService::new(store, export_dir),
            sessions: Arc::new(sessions),
        }
    }
}

/// Create the API router with the default registration rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(600))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    create_app(state, rate_limit, None)
}

/// Create the API router, serving `static_dir` for unmatched paths when set.
pub fn create_app(state: AppState, rate_limit: RateLimitState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        // Public write; the only rate-limited route
        .route(
            "/registrations",
            post(handlers::submit_registration).route_layer(
                axum_middleware::from_fn_with_state(rate_limit, rate_limit_middleware),
            ),
        )
        .route("/submission", get(handlers::latest_submission))
        .route("/admin", get(handlers::admin_records))
        .route("/download", get(handlers::download))
        .route("/api/login", post(handlers::login))
        .route("/api/tokenVerify", post(handlers::token_verify));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
