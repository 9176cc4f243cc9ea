use std::sync::Arc;

use common::storage::ObjectStore;
use common::vision::VisionAnalyzer;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared application state.
///
/// Every backend client (database pool, object store, vision model, outbound
/// HTTP) is constructed once at startup and injected here; request handlers
/// never build their own.
pub struct AppState {
    pub db: DatabaseConnection,
    pub store: Arc<dyn ObjectStore>,
    pub vision: Arc<dyn VisionAnalyzer>,
    /// Client for page fetches and image downloads, bounded by the fetch
    /// timeout.
    pub http: reqwest::Client,
    pub config: AppConfig,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            db: clone_db(&self.db),
            store: self.store.clone(),
            vision: self.vision.clone(),
            http: self.http.clone(),
            config: self.config.clone(),
        }
    }
}

// sea_orm's `mock` feature (enabled only for test builds via dev-dependencies)
// disables the derived `Clone` impl on `DatabaseConnection`, so it is cloned
// manually here instead.
fn clone_db(db: &DatabaseConnection) -> DatabaseConnection {
    match db {
        DatabaseConnection::SqlxPostgresPoolConnection(c) => {
            DatabaseConnection::SqlxPostgresPoolConnection(c.clone())
        }
        #[cfg(feature = "mock-db")]
        DatabaseConnection::MockDatabaseConnection(c) => {
            DatabaseConnection::MockDatabaseConnection(c.clone())
        }
        DatabaseConnection::Disconnected => DatabaseConnection::Disconnected,
    }
}
