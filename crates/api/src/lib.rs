//! HTTP API for the feature flag admin screens.
//!
//! This crate provides:
//! - Feature flag list, toggle and bulk routes
//! - The platform feature matrix
//! - Health checks

pub mod error;
pub mod routes;

use axum::Router;
use cmis_core::feature_flag::FlagCache;
use cmis_db::FeatureFlagRepository;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Feature flag reads and writes, sharing one value cache.
    pub flags: FeatureFlagRepository,
}

impl AppState {
    /// Builds the state around a connection pool and a flag cache.
    #[must_use]
    pub fn new(db: DatabaseConnection, cache: FlagCache) -> Self {
        let flags = FeatureFlagRepository::new(db.clone(), cache);
        Self {
            db: Arc::new(db),
            flags,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
