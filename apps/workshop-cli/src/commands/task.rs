//! # Task Commands
//!
//! Kanban board operations on the tasks of one order.
//!
//! Sale costs may be edited by anyone. Real costs are admin-only, and an
//! edit that touches them from a mechanic session is rejected as a whole.

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use workshop_core::validation::{parse_amount, parse_hours};
use workshop_core::{CoreError, TaskPhoto, TaskStatus, WorkOrder, WorkTask};

use super::load_order;
use super::order::OrderDetail;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Free-text edits on a task. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub mechanic_name: Option<String>,
    /// Hours as typed, e.g. "2.5".
    pub hours_worked: Option<String>,
    pub notes: Option<String>,
}

/// Cost edits as typed in the form. Unparseable input counts as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostUpdate {
    pub sale_cost: Option<String>,
    pub labor_sale_cost: Option<String>,
    pub real_cost: Option<String>,
    pub labor_real_cost: Option<String>,
}

impl CostUpdate {
    fn touches_real_costs(&self) -> bool {
        self.real_cost.is_some() || self.labor_real_cost.is_some()
    }
}

fn find_task(order: &WorkOrder, task_id: &str) -> Result<WorkTask, ApiError> {
    order.find_task(task_id).cloned().ok_or_else(|| {
        CoreError::TaskNotFound {
            order_id: order.id.clone(),
            task_id: task_id.to_string(),
        }
        .into()
    })
}

async fn save_and_view(
    db: &DbState,
    session: &SessionState,
    order: &WorkOrder,
) -> Result<OrderDetail, ApiError> {
    let order = db.inner().orders().save(order).await?;
    Ok(OrderDetail::for_role(&order, session.role()))
}

/// Adds a pending task to the board.
pub async fn add_task(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    description: &str,
) -> Result<OrderDetail, ApiError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ApiError::validation("Task description is required"));
    }

    let mut order = load_order(db, order_id).await?;
    let now = Utc::now();
    let mut task = WorkTask::new(order_id, now);
    task.description = description.to_string();
    order.upsert_task(task, now);

    info!(order_id = %order_id, "Task added");
    save_and_view(db, session, &order).await
}

pub async fn update_task(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    task_id: &str,
    update: TaskUpdate,
) -> Result<OrderDetail, ApiError> {
    let mut order = load_order(db, order_id).await?;
    let mut task = find_task(&order, task_id)?;

    if let Some(description) = update.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(ApiError::validation("Task description is required"));
        }
        task.description = description.to_string();
    }
    if let Some(name) = update.mechanic_name {
        task.mechanic_name = name.trim().to_string();
    }
    if let Some(hours) = update.hours_worked {
        task.hours_worked = parse_hours(&hours);
    }
    if let Some(notes) = update.notes {
        task.notes = notes;
    }

    order.upsert_task(task, Utc::now());
    save_and_view(db, session, &order).await
}

/// Moves a task to another column. The order status follows the board.
pub async fn move_task(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    task_id: &str,
    status: TaskStatus,
) -> Result<OrderDetail, ApiError> {
    let mut order = load_order(db, order_id).await?;
    if !order.move_task(task_id, status, Utc::now()) {
        return Err(CoreError::TaskNotFound {
            order_id: order_id.to_string(),
            task_id: task_id.to_string(),
        }
        .into());
    }

    debug!(order_id = %order_id, task_id = %task_id, ?status, "Task moved");
    save_and_view(db, session, &order).await
}

pub async fn delete_task(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    task_id: &str,
) -> Result<OrderDetail, ApiError> {
    let mut order = load_order(db, order_id).await?;
    if !order.remove_task(task_id, Utc::now()) {
        return Err(CoreError::TaskNotFound {
            order_id: order_id.to_string(),
            task_id: task_id.to_string(),
        }
        .into());
    }
    save_and_view(db, session, &order).await
}

/// Applies typed cost values to a task.
pub async fn update_task_costs(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    task_id: &str,
    costs: CostUpdate,
) -> Result<OrderDetail, ApiError> {
    if costs.touches_real_costs() {
        session.require_admin("edit real costs")?;
    }

    let mut order = load_order(db, order_id).await?;
    let mut task = find_task(&order, task_id)?;

    if let Some(v) = costs.sale_cost {
        task.sale_cost = parse_amount(&v);
    }
    if let Some(v) = costs.labor_sale_cost {
        task.labor_sale_cost = parse_amount(&v);
    }
    if let Some(v) = costs.real_cost {
        task.real_cost = parse_amount(&v);
    }
    if let Some(v) = costs.labor_real_cost {
        task.labor_real_cost = parse_amount(&v);
    }

    order.upsert_task(task, Utc::now());
    save_and_view(db, session, &order).await
}

/// Attaches an evidence photo to a task.
pub async fn add_task_photo(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    task_id: &str,
    uri: &str,
    note: &str,
) -> Result<OrderDetail, ApiError> {
    if uri.trim().is_empty() {
        return Err(ApiError::validation("Photo URI is required"));
    }

    let mut order = load_order(db, order_id).await?;
    let mut task = find_task(&order, task_id)?;
    let now = Utc::now();

    task.evidence_photos.push(TaskPhoto {
        id: Uuid::new_v4().to_string(),
        uri: uri.trim().to_string(),
        note: note.to_string(),
        timestamp: now,
    });

    order.upsert_task(task, now);
    save_and_view(db, session, &order).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::create_order;
    use crate::commands::test_support::db_state;
    use crate::error::ErrorCode;
    use workshop_core::{Money, OrderStatus, Role};

    async fn order_with_task(db: &DbState, session: &SessionState) -> (String, String) {
        let order = create_order(db, session).await.unwrap();
        let detail = add_task(db, session, &order.id, "Cambio de frenos").await.unwrap();
        (order.id, detail.tasks[0].id.clone())
    }

    #[tokio::test]
    async fn test_add_task_requires_description() {
        let db = db_state().await;
        let session = SessionState::new();
        let order = create_order(&db, &session).await.unwrap();

        let err = add_task(&db, &session, &order.id, "   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let detail = add_task(&db, &session, &order.id, " Afinación ").await.unwrap();
        assert_eq!(detail.tasks.len(), 1);
        assert_eq!(detail.tasks[0].description, "Afinación");
        assert_eq!(detail.tasks[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_moving_tasks_drives_order_status() {
        let db = db_state().await;
        let session = SessionState::new();
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let detail = move_task(&db, &session, &order_id, &task_id, TaskStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(detail.status, OrderStatus::InProgress);

        let detail = move_task(&db, &session, &order_id, &task_id, TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(detail.status, OrderStatus::Completed);

        let err = move_task(&db, &session, &order_id, "missing", TaskStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_task_parses_hours() {
        let db = db_state().await;
        let session = SessionState::new();
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let detail = update_task(
            &db,
            &session,
            &order_id,
            &task_id,
            TaskUpdate {
                mechanic_name: Some(" Luis ".to_string()),
                hours_worked: Some("2.5".to_string()),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();

        let task = &detail.tasks[0];
        assert_eq!(task.mechanic_name, "Luis");
        assert_eq!(task.hours_worked, 2.5);
        assert_eq!(task.hours_label, "2h 30m");
        assert_eq!(task.description, "Cambio de frenos");
    }

    #[tokio::test]
    async fn test_mechanic_cannot_edit_real_costs() {
        let db = db_state().await;
        let session = SessionState::new();
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let err = update_task_costs(
            &db,
            &session,
            &order_id,
            &task_id,
            CostUpdate {
                sale_cost: Some("500".to_string()),
                real_cost: Some("300".to_string()),
                ..CostUpdate::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // Rejected as a whole: the sale cost was not applied either
        let detail = crate::commands::order::get_order(&db, &session, &order_id)
            .await
            .unwrap();
        assert_eq!(detail.tasks[0].sale_cost, Money::zero());

        let detail = update_task_costs(
            &db,
            &session,
            &order_id,
            &task_id,
            CostUpdate {
                sale_cost: Some("500".to_string()),
                labor_sale_cost: Some("abc".to_string()),
                ..CostUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(detail.tasks[0].sale_cost, Money::from_cents(500_00));
        assert_eq!(detail.tasks[0].labor_sale_cost, Money::zero());
        assert!(detail.tasks[0].real_cost.is_none());
    }

    #[tokio::test]
    async fn test_admin_edits_real_costs() {
        let db = db_state().await;
        let session = SessionState::with_role(Role::Admin);
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let detail = update_task_costs(
            &db,
            &session,
            &order_id,
            &task_id,
            CostUpdate {
                sale_cost: Some("500".to_string()),
                labor_sale_cost: Some("200".to_string()),
                real_cost: Some("300".to_string()),
                labor_real_cost: Some("-40".to_string()),
            },
        )
        .await
        .unwrap();

        let task = &detail.tasks[0];
        assert_eq!(task.real_cost, Some(Money::from_cents(300_00)));
        assert_eq!(task.labor_real_cost, Some(Money::zero()));
        assert_eq!(task.margin, Some(Money::from_cents(400_00)));
    }

    #[tokio::test]
    async fn test_oversized_cost_input_keeps_budget_usable() {
        let db = db_state().await;
        let session = SessionState::with_role(Role::Admin);
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let detail = update_task_costs(
            &db,
            &session,
            &order_id,
            &task_id,
            CostUpdate {
                sale_cost: Some("99999999999999999999".to_string()),
                labor_sale_cost: Some("1".to_string()),
                real_cost: Some("99999999999999999999".to_string()),
                ..CostUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(detail.tasks[0].sale_cost, Money::zero());
        assert_eq!(detail.total_sale, Money::from_cents(1_00));

        let budget = crate::commands::budget::get_budget(&db, &session, &order_id)
            .await
            .unwrap();
        match budget {
            workshop_core::BudgetView::Admin(budget) => {
                assert_eq!(budget.summary.total_sale, Money::from_cents(1_00));
                assert_eq!(budget.summary.total_real_cost, Money::zero());
                assert_eq!(budget.summary.margin_percentage, 100.0);
            }
            other => panic!("expected admin view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_task_photos_and_delete() {
        let db = db_state().await;
        let session = SessionState::new();
        let (order_id, task_id) = order_with_task(&db, &session).await;

        let detail = add_task_photo(&db, &session, &order_id, &task_id, "file:///p.jpg", "pastillas")
            .await
            .unwrap();
        assert_eq!(detail.tasks[0].evidence_photos.len(), 1);
        assert_eq!(detail.tasks[0].evidence_photos[0].note, "pastillas");

        let detail = delete_task(&db, &session, &order_id, &task_id).await.unwrap();
        assert!(detail.tasks.is_empty());

        let err = delete_task(&db, &session, &order_id, &task_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
