//! # State Module
//!
//! Application state for the command layer.
//!
//! Commands take only the state types they need, the same way they would
//! as managed state in a GUI shell:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐           │
//! │  │   DbState    │  │  SessionState    │  │   ConfigState    │           │
//! │  │              │  │                  │  │                  │           │
//! │  │  Database    │  │  RwLock<Role>    │  │  shop_name       │           │
//! │  │  OrderIdGen  │  │  (admin gate)    │  │  country_code    │           │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘           │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: pool is thread-safe; ID allocation serialized by a lock    │
//! │  • SessionState: RwLock, reads far outnumber login/logout              │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;
