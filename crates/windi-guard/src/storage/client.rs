// [crates/windi-guard/src/storage/client.rs]
//! Connection management for the Guard's libsql-backed tables, following
//! the same connect-then-bootstrap shape as the teacher's database client.

use std::sync::Arc;

use libsql::{Builder, Connection, Database};
use tracing::{info, instrument};

use super::schema::apply_guard_schema;
use crate::error::{GuardError, Result};

#[derive(Clone)]
pub struct GuardDb {
    database: Arc<Database>,
    /// Keeps an in-memory database's single backing store alive; dropping
    /// every connection to a `:memory:` libsql database would otherwise
    /// let SQLite reclaim it between calls.
    _memory_anchor: Option<Arc<Connection>>,
}

impl GuardDb {
    #[instrument(skip(access_token))]
    pub async fn connect(connection_url: &str, access_token: Option<String>) -> Result<Self> {
        if connection_url.is_empty() {
            return Err(GuardError::Connection("WINDI_EVENT_LOG_DB is not set".to_string()));
        }

        let is_remote = connection_url.starts_with("libsql://") || connection_url.starts_with("https://");
        let is_memory = connection_url.contains(":memory:") || connection_url.contains("mode=memory");

        let database = if is_remote {
            let token = access_token
                .ok_or_else(|| GuardError::Connection("remote guard DB requires an access token".to_string()))?;
            Builder::new_remote(connection_url.to_string(), token)
                .build()
                .await
                .map_err(|e| GuardError::Connection(e.to_string()))?
        } else {
            Builder::new_local(connection_url)
                .build()
                .await
                .map_err(|e| GuardError::Connection(e.to_string()))?
        };

        let mut anchor = None;
        if is_memory {
            let anchor_conn = database.connect().map_err(|e| GuardError::Connection(e.to_string()))?;
            apply_guard_schema(&anchor_conn).await?;
            anchor = Some(Arc::new(anchor_conn));
        } else {
            let bootstrap = database.connect().map_err(|e| GuardError::Connection(e.to_string()))?;
            apply_guard_schema(&bootstrap).await?;
        }

        info!("guard database schema synchronized at {}", connection_url);

        Ok(GuardDb {
            database: Arc::new(database),
            _memory_anchor: anchor,
        })
    }

    pub fn connection(&self) -> Result<Connection> {
        self.database.connect().map_err(|e| GuardError::Connection(e.to_string()))
    }
}
