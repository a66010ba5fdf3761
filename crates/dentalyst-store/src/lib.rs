//! # dentalyst-store — Record Store
//!
//! Persistence layer for Dentalyst. Exposes the [`ExpenseStore`] and
//! [`ConsultantStore`] traits as the seam between the API layer and
//! storage, with two interchangeable implementations:
//!
//! - **PostgreSQL** ([`postgres`]) — the production store, built on SQLx
//!   with embedded migrations. Operations fail fast with
//!   [`StoreError::Unavailable`] while the database is unreachable.
//! - **In-memory** ([`memory`]) — backs the test suite and the
//!   no-`DATABASE_URL` development mode.
//!
//! ## Connection management
//!
//! The [`connection::ConnectionManager`] owns the pool and an explicit
//! connection state machine (`DISCONNECTED → CONNECTING → CONNECTED`).
//! A background monitor task pings the database and reconnects with
//! capped exponential backoff; request handlers observe the state and
//! never block on a reconnect. The manager's status query feeds the
//! health endpoint.
//!
//! ## Crate Policy
//!
//! - No HTTP types; the API layer maps [`StoreError`] to responses.
//! - Stores accept only pre-validated drafts (`NewExpense`,
//!   `NewConsultant`) from `dentalyst-core`.
//! - Locks are `parking_lot` and never held across `.await` points.

pub mod connection;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use connection::{ConnectionManager, ConnectionState, ConnectionStatus};
pub use error::StoreError;
pub use memory::{MemoryConsultantStore, MemoryExpenseStore};
pub use postgres::{PgConsultantStore, PgExpenseStore};
pub use traits::{ConsultantStore, ExpenseStore};
