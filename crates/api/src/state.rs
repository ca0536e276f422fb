use std::sync::Arc;

use verde_cloud::auth::AuthProvider;
use verde_cloud::geocoding::Geocoder;
use verde_cloud::storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: verde_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Hosted auth provider.
    pub auth: Arc<dyn AuthProvider>,
    /// Object storage backend (remote or local).
    pub storage: Arc<dyn ObjectStore>,
    pub geocoder: Arc<Geocoder>,
}
