//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! Handlers talk to storage only through the `ExpenseStore` /
//! `ConsultantStore` trait objects, so the same routes serve the
//! PostgreSQL deployment and the in-memory test/development mode. The
//! [`DatabaseHandle`] carries the connection-status source for the
//! health endpoint — an explicit injected object, not ambient globals.

use std::sync::Arc;

use dentalyst_store::{
    ConnectionManager, ConnectionState, ConnectionStatus, ConsultantStore, ExpenseStore,
    MemoryConsultantStore, MemoryExpenseStore, PgConsultantStore, PgExpenseStore,
};

/// Server configuration, read from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// CORS allow-list of origins; requests from other origins are
    /// refused by the CORS layer.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            allowed_origins: Vec::new(),
        }
    }
}

/// Where the records live, and how to report on the connection.
#[derive(Clone)]
pub enum DatabaseHandle {
    /// PostgreSQL via the connection manager.
    Postgres(ConnectionManager),
    /// In-memory stores; always "connected".
    Memory,
}

impl DatabaseHandle {
    /// Status snapshot for the health endpoint.
    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::Postgres(manager) => manager.status(),
            Self::Memory => ConnectionStatus {
                state: ConnectionState::Connected,
                host: "memory".to_string(),
                database: "dentalyst".to_string(),
            },
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub expenses: Arc<dyn ExpenseStore>,
    pub consultants: Arc<dyn ConsultantStore>,
    pub database: DatabaseHandle,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// In-memory state with default configuration. Used by tests and the
    /// no-`DATABASE_URL` development mode.
    pub fn in_memory() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// In-memory state with explicit configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            expenses: Arc::new(MemoryExpenseStore::new()),
            consultants: Arc::new(MemoryConsultantStore::new()),
            database: DatabaseHandle::Memory,
            config: Arc::new(config),
        }
    }

    /// PostgreSQL-backed state sharing one connection manager.
    pub fn with_postgres(config: AppConfig, manager: ConnectionManager) -> Self {
        Self {
            expenses: Arc::new(PgExpenseStore::new(manager.clone())),
            consultants: Arc::new(PgConsultantStore::new(manager.clone())),
            database: DatabaseHandle::Postgres(manager),
            config: Arc::new(config),
        }
    }
}
