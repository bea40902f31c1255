//! # workshop-core: Pure Business Logic for Workshop Manager
//!
//! This crate holds the business rules of the repair shop as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Workshop Manager Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end / CLI                              │   │
//! │  │    Reception ──► Kanban Tasks ──► Budget ──► Quote / WhatsApp   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ workshop-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐ │   │
//! │  │   │  types   │ │  money   │ │  budget  │ │ order_id / quote │ │   │
//! │  │   │ WorkOrder│ │  Money   │ │ Summary  │ │ YYMMDD-NN, HTML  │ │   │
//! │  │   │ WorkTask │ │  cents   │ │ Views    │ │ WhatsApp text    │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 workshop-db (Database Layer)                    │   │
//! │  │          kv store, order counter, orders, admin PIN             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (WorkOrder, WorkTask, Role, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`budget`] - Totals, margins and role-specific budget views
//! - [`order_id`] - Daily `YYMMDD-NN` work-order identifiers
//! - [`quote`] - Client-facing quote documents and share links
//! - [`validation`] - Input validation and lenient numeric parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use workshop_core::budget::compute_summary;
//! use workshop_core::money::Money;
//! use workshop_core::types::WorkTask;
//!
//! let mut task = WorkTask::new("250615-01", chrono::Utc::now());
//! task.sale_cost = Money::from_cents(100_00);
//! task.real_cost = Money::from_cents(150_00);
//!
//! let summary = compute_summary(&[task]);
//! assert_eq!(summary.margin.cents(), -50_00);
//! assert_eq!(summary.margin_percentage, -50.0);
//! ```

pub mod budget;
pub mod error;
pub mod money;
pub mod order_id;
pub mod quote;
pub mod types;
pub mod validation;

pub use budget::{compute_summary, per_task_margin, BudgetSummary, BudgetView};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order_id::DailyCounter;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// PIN used for the admin gate until the shop customises it.
pub const DEFAULT_ADMIN_PIN: &str = "1234";

/// Country calling code prepended to client phone numbers in share links.
pub const DEFAULT_COUNTRY_CODE: &str = "52";

/// Name printed on client quotes when none is configured.
pub const DEFAULT_SHOP_NAME: &str = "Workshop Manager";
