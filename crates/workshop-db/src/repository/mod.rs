//! # Repository Module
//!
//! Database repository implementations for Workshop Manager.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and What They Own                       │
//! │                                                                         │
//! │  Command layer                                                          │
//! │       │                                                                 │
//! │       │  db.orders().get_by_id("250615-01")                             │
//! │       ▼                                                                 │
//! │  OrderRepository ──────────► work_orders + work_tasks                   │
//! │  OrderIdGenerator ─┐                                                    │
//! │  AuthRepository ───┼──► KvRepository ──► kv_store                       │
//! │                    │                                                    │
//! │  CounterRepository ┘   (ot_counter, workshop_auth, admin_pin)           │
//! │                                                                         │
//! │  SQL lives only in these files.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - Raw key-value records
//! - [`counter::OrderIdGenerator`] - Daily `YYMMDD-NN` IDs over a [`counter::CounterStore`]
//! - [`order::OrderRepository`] - Work orders and tasks
//! - [`auth::AuthRepository`] - Admin PIN and remembered login

pub mod auth;
pub mod counter;
pub mod kv;
pub mod order;
