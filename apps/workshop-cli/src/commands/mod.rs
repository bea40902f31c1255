//! # Commands Module
//!
//! Every operation the CLI exposes, as plain async functions.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  order.rs    create_order, list_orders, get_order, update_reception,    │
//! │              set_inspection_photo, deliver_order, delete_order          │
//! │  task.rs     add_task, update_task, move_task, delete_task,             │
//! │              update_task_costs, add_task_photo                          │
//! │  budget.rs   get_budget, client_quote_html, client_whatsapp_link        │
//! │  auth.rs     login, login_as_mechanic, logout, current_role,            │
//! │              change_admin_pin                                           │
//! │  export.rs   export_daily                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_orders(db: &DbState)
//!
//! // Output depends on the role
//! async fn get_budget(db: &DbState, session: &SessionState, order_id: &str)
//!
//! // Needs shop settings for the document
//! async fn client_quote_html(db: &DbState, config: &ConfigState, order_id: &str)
//! ```
//!
//! Anything returned to a non-admin session carries sale-side figures only.

pub mod auth;
pub mod budget;
pub mod export;
pub mod order;
pub mod task;

use workshop_core::{CoreError, WorkOrder};

use crate::error::ApiError;
use crate::state::DbState;

/// Loads an order or fails with `NOT_FOUND`.
pub(crate) async fn load_order(db: &DbState, order_id: &str) -> Result<WorkOrder, ApiError> {
    db.inner()
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()).into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use workshop_db::{Database, DbConfig};

    use crate::state::DbState;

    pub async fn db_state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }
}
