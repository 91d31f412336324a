//! # Helpdesk API
//!
//! REST surface for the helpdesk service: account registration/login and
//! the support-request endpoints, with domain errors mapped onto the
//! `{success, message}` envelope every response carries.

pub mod config;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use helpdesk_requests_core::RequestService;
use helpdesk_users_core::AuthService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub requests: Arc<RequestService>,
}

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/requests",
            post(handlers::create_request).get(handlers::list_all_requests),
        )
        .route(
            "/api/requests/:id",
            get(handlers::get_single_request)
                .put(handlers::update_request)
                .delete(handlers::delete_request),
        )
        .route(
            "/api/requests/by-status/:status",
            get(handlers::list_requests_by_status),
        )
        .route("/api/requestsByUserID", get(handlers::list_my_requests))
        .route(
            "/api/requestsAdmin/:id",
            delete(handlers::delete_request_admin),
        )
        .route(
            "/api/requestsAdminAccept/:id",
            patch(handlers::update_request_status),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wire the services onto a database and build the state the router needs.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = helpdesk_users_core::user_store::connect(&config.database_url).await?;

    let user_store = Arc::new(helpdesk_users_core::SqliteUserStore::new(pool.clone()).await?);
    let auth = AuthService::new(
        user_store.clone(),
        &config.jwt,
        config.password.clone(),
    )?;

    let request_store = Arc::new(helpdesk_requests_core::SqliteRequestStore::new(pool).await?);
    let requests = RequestService::new(request_store, user_store);

    Ok(AppState {
        auth: Arc::new(auth),
        requests: Arc::new(requests),
    })
}
