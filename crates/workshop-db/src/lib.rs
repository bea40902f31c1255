//! # workshop-db: Database Layer for Workshop Manager
//!
//! This crate provides persistence for the workshop. It uses SQLite for
//! local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Workshop Manager Data Flow                          │
//! │                                                                         │
//! │  CLI command (create_order)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   workshop-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)   │  │   │
//! │  │   │               │    │ OrderRepo      │   │               │  │   │
//! │  │   │ SqlitePool    │◄───│ AuthRepo       │   │ 001_initial_  │  │   │
//! │  │   │ WAL, FKs on   │    │ OrderIdGen     │   │   schema.sql  │  │   │
//! │  │   │               │    │ KvRepo         │   │               │  │   │
//! │  │   └───────────────┘    └────────────────┘   └───────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/workshop.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use workshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("workshop.db")).await?;
//!
//! let id = db.order_ids().allocate_next_id().await;
//! let order = db.orders().save(&WorkOrder::new(id, Utc::now())).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::auth::AuthRepository;
pub use repository::counter::{CounterRepository, CounterStore, OrderIdGenerator};
pub use repository::kv::KvRepository;
pub use repository::order::OrderRepository;
