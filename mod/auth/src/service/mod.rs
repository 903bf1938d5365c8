pub mod credentials;
pub mod token;
pub mod users;

use std::sync::Arc;

use chirp_core::ServiceError;
use chirp_sql::SqlStore;

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret (HS256).
    pub jwt_secret: String,
    /// Token lifetime in days (default: 7).
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "chirp-dev-secret-change-me-0123456789ab".to_string(),
            token_ttl_days: 7,
        }
    }
}

/// The auth service: identity store + credential service + guard.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SqlStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the users table.
    pub fn new(
        sql: Arc<dyn SqlStore>,
        config: AuthConfig,
    ) -> Result<Arc<Self>, ServiceError> {
        init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }
}

fn init_schema(sql: &dyn SqlStore) -> Result<(), ServiceError> {
    sql.exec_batch(&[
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    ])
    .map_err(|e| ServiceError::Storage(e.to_string()))
}
