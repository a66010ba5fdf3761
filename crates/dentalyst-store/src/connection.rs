//! # Database Connection Manager
//!
//! An explicit connection state machine, injected into request handlers
//! rather than read from ambient globals.
//!
//! ## States
//!
//! ```text
//! DISCONNECTED ──▶ CONNECTING ──▶ CONNECTED
//!       ▲               │             │
//!       │               ▼             │
//!       └──── backoff sleep ◀─── ping failure
//! ```
//!
//! A background monitor task drives the machine: it pings the database,
//! applies embedded migrations on the first successful contact, and on
//! failure retries with capped exponential backoff (500 ms doubling to a
//! 30 s ceiling, reset on success). Request handlers read the state
//! through [`ConnectionManager::pool()`] and fail fast while it is not
//! `Connected` — requests never queue behind a reconnect.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::StoreError;

/// First retry delay after a failed connect or ping.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
/// Ceiling for the exponential backoff.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// How often the monitor pings a healthy connection.
pub const PING_INTERVAL: Duration = Duration::from_secs(10);

/// Embedded schema migrations, applied once per process on the first
/// successful connection.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No usable connection; a retry is pending.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The database answered the last ping.
    Connected,
}

impl ConnectionState {
    /// Whether store operations may proceed.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Lowercase state name as reported by the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the connection for the health endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Database host, parsed from the connection string.
    pub host: String,
    /// Database name, parsed from the connection string.
    pub database: String,
}

struct Inner {
    state: RwLock<ConnectionState>,
    pool: PgPool,
    host: String,
    database: String,
}

/// Owns the SQLx pool and the connection state machine.
///
/// Cheaply cloneable; clones share the same state and pool.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    /// Build a manager for the given connection string.
    ///
    /// The pool is created lazily — no connection is attempted here; call
    /// [`ConnectionManager::spawn_monitor`] to start connecting.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection string itself is malformed.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;

        let (host, database) = describe_url(database_url);

        Ok(Self {
            inner: Arc::new(Inner {
                state: RwLock::new(ConnectionState::Disconnected),
                pool,
                host,
                database,
            }),
        })
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.read()
    }

    /// Status snapshot for the health endpoint.
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            state: self.state(),
            host: self.inner.host.clone(),
            database: self.inner.database.clone(),
        }
    }

    /// The pool, if the database is currently connected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] in any other state, so store
    /// operations fail fast instead of queueing behind a reconnect.
    pub fn pool(&self) -> Result<&PgPool, StoreError> {
        let state = self.state();
        if state.is_available() {
            Ok(&self.inner.pool)
        } else {
            Err(StoreError::Unavailable(state.as_str().to_string()))
        }
    }

    /// Start the background monitor task.
    ///
    /// The task pings the database, applies migrations on first contact,
    /// and reconnects with capped exponential backoff after failures. It
    /// runs for the life of the process, independent of request handling.
    pub fn spawn_monitor(&self) -> tokio::task::JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut backoff = INITIAL_BACKOFF;
            let mut migrated = false;
            loop {
                *inner.state.write() = ConnectionState::Connecting;
                match sqlx::query("SELECT 1").execute(&inner.pool).await {
                    Ok(_) => {
                        if !migrated {
                            if let Err(e) = MIGRATOR.run(&inner.pool).await {
                                tracing::error!(error = %e, "schema migration failed");
                                *inner.state.write() = ConnectionState::Disconnected;
                                tokio::time::sleep(backoff).await;
                                backoff = next_backoff(backoff);
                                continue;
                            }
                            migrated = true;
                        }

                        *inner.state.write() = ConnectionState::Connected;
                        backoff = INITIAL_BACKOFF;
                        tracing::info!(
                            host = %inner.host,
                            database = %inner.database,
                            "database connected"
                        );

                        // Healthy: ping until something breaks.
                        loop {
                            tokio::time::sleep(PING_INTERVAL).await;
                            if let Err(e) = sqlx::query("SELECT 1").execute(&inner.pool).await {
                                tracing::warn!(error = %e, "database ping failed");
                                *inner.state.write() = ConnectionState::Disconnected;
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        *inner.state.write() = ConnectionState::Disconnected;
                        tracing::warn!(
                            error = %e,
                            retry_in_ms = backoff.as_millis() as u64,
                            "database unreachable"
                        );
                        tokio::time::sleep(backoff).await;
                        backoff = next_backoff(backoff);
                    }
                }
            }
        })
    }
}

/// The delay to use after the given delay has elapsed without success.
pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Extract `(host, database-name)` from a connection string for status
/// reporting. Falls back to `"unknown"` rather than failing — status
/// display must not depend on URL introspection.
fn describe_url(database_url: &str) -> (String, String) {
    match url::Url::parse(database_url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("unknown").to_string();
            let database = parsed
                .path()
                .trim_start_matches('/')
                .split('?')
                .next()
                .filter(|name| !name.is_empty())
                .unwrap_or("unknown")
                .to_string();
            (host, database)
        }
        Err(_) => ("unknown".to_string(), "unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Connected.to_string(), "connected");
    }

    #[test]
    fn test_only_connected_is_available() {
        assert!(!ConnectionState::Disconnected.is_available());
        assert!(!ConnectionState::Connecting.is_available());
        assert!(ConnectionState::Connected.is_available());
    }

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut backoff = INITIAL_BACKOFF;
        let mut observed = vec![backoff];
        for _ in 0..8 {
            backoff = next_backoff(backoff);
            observed.push(backoff);
        }
        assert_eq!(observed[0], Duration::from_millis(500));
        assert_eq!(observed[1], Duration::from_secs(1));
        assert_eq!(observed[2], Duration::from_secs(2));
        assert_eq!(observed[3], Duration::from_secs(4));
        assert_eq!(observed[4], Duration::from_secs(8));
        assert_eq!(observed[5], Duration::from_secs(16));
        // Capped from here on.
        assert_eq!(observed[6], MAX_BACKOFF);
        assert_eq!(observed[7], MAX_BACKOFF);
    }

    #[test]
    fn test_describe_url() {
        let (host, db) = describe_url("postgres://user:pw@db.clinic.local:5432/dentalyst");
        assert_eq!(host, "db.clinic.local");
        assert_eq!(db, "dentalyst");
    }

    #[test]
    fn test_describe_url_with_params() {
        let (host, db) = describe_url("postgres://u@localhost/dentalyst?sslmode=require");
        assert_eq!(host, "localhost");
        assert_eq!(db, "dentalyst");
    }

    #[test]
    fn test_describe_url_garbage() {
        let (host, db) = describe_url("not a url");
        assert_eq!(host, "unknown");
        assert_eq!(db, "unknown");
    }

    #[tokio::test]
    async fn test_manager_starts_disconnected_and_refuses_pool() {
        let manager = ConnectionManager::new("postgres://u@localhost/dentalyst").unwrap();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        let err = manager.pool().unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let manager = ConnectionManager::new("postgres://u@db.clinic.local/dentalyst").unwrap();
        let status = manager.status();
        assert_eq!(status.state, ConnectionState::Disconnected);
        assert_eq!(status.host, "db.clinic.local");
        assert_eq!(status.database, "dentalyst");
    }
}
