//! # Work Order Repository
//!
//! Persists work orders together with their tasks.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  work_orders                          work_tasks                        │
//! │  ──────────────────────────           ──────────────────────────────    │
//! │  id  "250615-01"          ◄────────── order_id  (ON DELETE CASCADE)     │
//! │  status, vehicle columns              position  (board order)           │
//! │  client_name, client_phone            *_cents   (sale + real columns)   │
//! │  photos_json                          evidence_photos_json              │
//! │                                                                         │
//! │  save() rewrites the order row and all of its task rows in one          │
//! │  transaction, so a reader never sees half an order.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use workshop_core::{
    InspectionPhoto, Money, OrderStatus, TaskPhoto, TaskStatus, VehicleInfo, WorkOrder, WorkTask,
};

use crate::error::{DbError, DbResult};

const ORDER_COLUMNS: &str = r#"
    id, status,
    vin, plates, brand, model, year, color, engine, odometer,
    client_name, client_phone, reason_for_visit,
    photos_json, created_at, updated_at
"#;

const TASK_COLUMNS: &str = r#"
    id, order_id, description, status, mechanic_name, hours_worked,
    sale_cost_cents, labor_sale_cost_cents, real_cost_cents, labor_real_cost_cents,
    evidence_photos_json, notes, created_at, updated_at
"#;

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    status: OrderStatus,
    vin: String,
    plates: String,
    brand: String,
    model: String,
    year: String,
    color: String,
    engine: String,
    odometer: String,
    client_name: String,
    client_phone: String,
    reason_for_visit: String,
    photos_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, tasks: Vec<WorkTask>) -> DbResult<WorkOrder> {
        let photos: Vec<InspectionPhoto> = serde_json::from_str(&self.photos_json)
            .map_err(|e| DbError::corrupt(format!("work_orders.photos_json[{}]", self.id), e))?;

        Ok(WorkOrder {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status,
            vehicle: VehicleInfo {
                vin: self.vin,
                plates: self.plates,
                brand: self.brand,
                model: self.model,
                year: self.year,
                color: self.color,
                engine: self.engine,
                odometer: self.odometer,
            },
            client_name: self.client_name,
            client_phone: self.client_phone,
            reason_for_visit: self.reason_for_visit,
            photos,
            tasks,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    order_id: String,
    description: String,
    status: TaskStatus,
    mechanic_name: String,
    hours_worked: f64,
    sale_cost_cents: i64,
    labor_sale_cost_cents: i64,
    real_cost_cents: i64,
    labor_real_cost_cents: i64,
    evidence_photos_json: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> DbResult<WorkTask> {
        let evidence_photos: Vec<TaskPhoto> = serde_json::from_str(&self.evidence_photos_json)
            .map_err(|e| DbError::corrupt(format!("work_tasks.evidence_photos_json[{}]", self.id), e))?;

        Ok(WorkTask {
            id: self.id,
            order_id: self.order_id,
            description: self.description,
            status: self.status,
            mechanic_name: self.mechanic_name,
            hours_worked: self.hours_worked,
            sale_cost: Money::from_cents(self.sale_cost_cents),
            labor_sale_cost: Money::from_cents(self.labor_sale_cost_cents),
            real_cost: Money::from_cents(self.real_cost_cents),
            labor_real_cost: Money::from_cents(self.labor_real_cost_cents),
            evidence_photos,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for work orders and their tasks.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// All orders, newest first, each with its tasks in board order.
    pub async fn list_all(&self) -> DbResult<Vec<WorkOrder>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM work_orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let task_rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM work_tasks ORDER BY order_id, position"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows, task_rows)
    }

    /// Orders whose `created_at` falls on `date` (UTC), newest first.
    pub async fn list_created_on(&self, date: NaiveDate) -> DbResult<Vec<WorkOrder>> {
        let start = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let end = date
            .checked_add_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(Vec::new());
        };

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM work_orders \
             WHERE created_at >= ?1 AND created_at < ?2 \
             ORDER BY created_at DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let task_rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM work_tasks \
             WHERE order_id IN (SELECT id FROM work_orders WHERE created_at >= ?1 AND created_at < ?2) \
             ORDER BY order_id, position"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows, task_rows)
    }

    /// Gets an order with its tasks.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<WorkOrder>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM work_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tasks = self.tasks_for(id).await?;
        row.into_order(tasks).map(Some)
    }

    /// Inserts a new order or overwrites an existing one.
    ///
    /// When the order already exists its `updated_at` is set to now; a new
    /// order keeps the timestamps it was built with. Returns what was
    /// stored.
    pub async fn save(&self, order: &WorkOrder) -> DbResult<WorkOrder> {
        let mut order = order.clone();
        let photos_json = serde_json::to_string(&order.photos)
            .map_err(|e| DbError::corrupt(format!("work_orders.photos_json[{}]", order.id), e))?;

        let mut tx = self.pool.begin().await?;

        let existing: Option<String> = sqlx::query_scalar("SELECT id FROM work_orders WHERE id = ?1")
            .bind(&order.id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            order.updated_at = Utc::now();
        }

        debug!(id = %order.id, update = existing.is_some(), tasks = order.tasks.len(), "Saving work order");

        sqlx::query(
            r#"
            INSERT INTO work_orders (
                id, status,
                vin, plates, brand, model, year, color, engine, odometer,
                client_name, client_phone, reason_for_visit,
                photos_json, created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15, ?16
            )
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                vin = excluded.vin,
                plates = excluded.plates,
                brand = excluded.brand,
                model = excluded.model,
                year = excluded.year,
                color = excluded.color,
                engine = excluded.engine,
                odometer = excluded.odometer,
                client_name = excluded.client_name,
                client_phone = excluded.client_phone,
                reason_for_visit = excluded.reason_for_visit,
                photos_json = excluded.photos_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&order.id)
        .bind(order.status)
        .bind(&order.vehicle.vin)
        .bind(&order.vehicle.plates)
        .bind(&order.vehicle.brand)
        .bind(&order.vehicle.model)
        .bind(&order.vehicle.year)
        .bind(&order.vehicle.color)
        .bind(&order.vehicle.engine)
        .bind(&order.vehicle.odometer)
        .bind(&order.client_name)
        .bind(&order.client_phone)
        .bind(&order.reason_for_visit)
        .bind(&photos_json)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM work_tasks WHERE order_id = ?1")
            .bind(&order.id)
            .execute(&mut *tx)
            .await?;

        for (position, task) in order.tasks.iter().enumerate() {
            let evidence_json = serde_json::to_string(&task.evidence_photos).map_err(|e| {
                DbError::corrupt(format!("work_tasks.evidence_photos_json[{}]", task.id), e)
            })?;

            sqlx::query(
                r#"
                INSERT INTO work_tasks (
                    id, order_id, position, description, status, mechanic_name, hours_worked,
                    sale_cost_cents, labor_sale_cost_cents, real_cost_cents, labor_real_cost_cents,
                    evidence_photos_json, notes, created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                    ?8, ?9, ?10, ?11,
                    ?12, ?13, ?14, ?15
                )
                "#,
            )
            .bind(&task.id)
            .bind(&order.id)
            .bind(position as i64)
            .bind(&task.description)
            .bind(task.status)
            .bind(&task.mechanic_name)
            .bind(task.hours_worked)
            .bind(task.sale_cost.cents())
            .bind(task.labor_sale_cost.cents())
            .bind(task.real_cost.cents())
            .bind(task.labor_real_cost.cents())
            .bind(&evidence_json)
            .bind(&task.notes)
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Deletes an order and its tasks. Returns `false` if it did not exist.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting work order");

        let result = sqlx::query("DELETE FROM work_orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn tasks_for(&self, order_id: &str) -> DbResult<Vec<WorkTask>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM work_tasks WHERE order_id = ?1 ORDER BY position"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    fn assemble(&self, rows: Vec<OrderRow>, task_rows: Vec<TaskRow>) -> DbResult<Vec<WorkOrder>> {
        let mut tasks_by_order: HashMap<String, Vec<WorkTask>> = HashMap::new();
        for row in task_rows {
            let task = row.into_task()?;
            tasks_by_order.entry(task.order_id.clone()).or_default().push(task);
        }

        let mut orders = rows
            .into_iter()
            .map(|row| {
                let tasks = tasks_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(tasks)
            })
            .collect::<DbResult<Vec<_>>>()?;

        // Text ordering of timestamps is only second-accurate
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
