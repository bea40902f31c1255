//! # Order Commands
//!
//! Reception and order-level operations.
//!
//! ## Reception Flow
//! ```text
//! create_order ──► "250615-01" in Recepción
//!      │
//!      ├── update_reception   vehicle, client, reason (plates or VIN required)
//!      ├── set_inspection_photo × 6 slots
//!      │
//!      ▼
//! tasks move on the board ──► En Proceso ──► Finalizado
//!      │
//!      ▼
//! deliver_order ──► Entregado
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use workshop_core::budget::per_task_margin;
use workshop_core::validation::{format_hours, validate_vehicle_identity};
use workshop_core::{
    CoreError, InspectionPhoto, Money, OrderStatus, PhotoSlot, Role, TaskPhoto, TaskStatus,
    VehicleInfo, WorkOrder, WorkTask,
};

use super::load_order;
use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Attempts at finding an unused ID before giving up. Only the random
/// fallback can hand out an ID that is already taken.
const MAX_ID_ATTEMPTS: usize = 5;

// =============================================================================
// Views
// =============================================================================

/// One row of the order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub status: OrderStatus,
    pub status_label: String,
    pub vehicle: String,
    pub plates: String,
    pub client_name: String,
    pub task_count: usize,
    pub total_sale: Money,
    pub created_at: DateTime<Utc>,
}

impl From<&WorkOrder> for OrderSummary {
    fn from(order: &WorkOrder) -> Self {
        OrderSummary {
            id: order.id.clone(),
            status: order.status,
            status_label: order.status.label().to_string(),
            vehicle: format!("{} {}", order.vehicle.brand, order.vehicle.model)
                .trim()
                .to_string(),
            plates: order.vehicle.plates.clone(),
            client_name: order.client_name.clone(),
            task_count: order.tasks.len(),
            total_sale: order.tasks.iter().map(WorkTask::sale_subtotal).sum(),
            created_at: order.created_at,
        }
    }
}

/// A task as the current role may see it.
///
/// Cost-side fields are omitted entirely, not zeroed, for non-admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub status_label: String,
    pub mechanic_name: String,
    pub hours_worked: f64,
    pub hours_label: String,
    pub sale_cost: Money,
    pub labor_sale_cost: Money,
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_real_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Money>,
    pub evidence_photos: Vec<TaskPhoto>,
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    pub fn for_role(task: &WorkTask, role: Role) -> Self {
        let admin = role.is_admin();
        TaskView {
            id: task.id.clone(),
            description: task.description.clone(),
            status: task.status,
            status_label: task.status.label().to_string(),
            mechanic_name: task.mechanic_name.clone(),
            hours_worked: task.hours_worked,
            hours_label: format_hours(task.hours_worked),
            sale_cost: task.sale_cost,
            labor_sale_cost: task.labor_sale_cost,
            subtotal: task.sale_subtotal(),
            real_cost: admin.then_some(task.real_cost),
            labor_real_cost: admin.then_some(task.labor_real_cost),
            margin: admin.then(|| per_task_margin(task)),
            evidence_photos: task.evidence_photos.clone(),
            notes: task.notes.clone(),
            updated_at: task.updated_at,
        }
    }
}

/// Full order as the current role may see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    pub status: OrderStatus,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vehicle: VehicleInfo,
    pub client_name: String,
    pub client_phone: String,
    pub reason_for_visit: String,
    pub photos: Vec<InspectionPhoto>,
    pub photos_completed: usize,
    pub missing_photo_slots: Vec<PhotoSlot>,
    pub tasks: Vec<TaskView>,
    pub total_sale: Money,
}

impl OrderDetail {
    pub fn for_role(order: &WorkOrder, role: Role) -> Self {
        OrderDetail {
            id: order.id.clone(),
            status: order.status,
            status_label: order.status.label().to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            vehicle: order.vehicle.clone(),
            client_name: order.client_name.clone(),
            client_phone: order.client_phone.clone(),
            reason_for_visit: order.reason_for_visit.clone(),
            photos: order.photos.clone(),
            photos_completed: order.photos_completed(),
            missing_photo_slots: order.missing_photo_slots(),
            tasks: order
                .tasks
                .iter()
                .map(|t| TaskView::for_role(t, role))
                .collect(),
            total_sale: order.tasks.iter().map(WorkTask::sale_subtotal).sum(),
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Reception form. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceptionUpdate {
    pub vin: Option<String>,
    pub plates: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub color: Option<String>,
    pub engine: Option<String>,
    pub odometer: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub reason_for_visit: Option<String>,
}

impl ReceptionUpdate {
    fn apply(self, order: &mut WorkOrder) {
        let v = &mut order.vehicle;
        let fields: [(&mut String, Option<String>); 11] = [
            (&mut v.vin, self.vin),
            (&mut v.plates, self.plates),
            (&mut v.brand, self.brand),
            (&mut v.model, self.model),
            (&mut v.year, self.year),
            (&mut v.color, self.color),
            (&mut v.engine, self.engine),
            (&mut v.odometer, self.odometer),
            (&mut order.client_name, self.client_name),
            (&mut order.client_phone, self.client_phone),
            (&mut order.reason_for_visit, self.reason_for_visit),
        ];
        for (target, value) in fields {
            if let Some(value) = value {
                *target = value.trim().to_string();
            }
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Opens a new order in reception with the next daily ID.
pub async fn create_order(db: &DbState, session: &SessionState) -> Result<OrderDetail, ApiError> {
    let orders = db.inner().orders();

    for attempt in 1..=MAX_ID_ATTEMPTS {
        let id = db.order_ids().allocate_next_id().await;

        if orders.get_by_id(&id).await?.is_some() {
            warn!(id = %id, attempt, "Allocated order id already in use, retrying");
            continue;
        }

        let order = orders.save(&WorkOrder::new(id, Utc::now())).await?;
        info!(id = %order.id, "Work order created");
        return Ok(OrderDetail::for_role(&order, session.role()));
    }

    Err(ApiError::internal("Could not allocate a free work order id"))
}

/// All orders, newest first.
pub async fn list_orders(db: &DbState) -> Result<Vec<OrderSummary>, ApiError> {
    let orders = db.inner().orders().list_all().await?;
    Ok(orders.iter().map(OrderSummary::from).collect())
}

pub async fn get_order(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
) -> Result<OrderDetail, ApiError> {
    let order = load_order(db, order_id).await?;
    Ok(OrderDetail::for_role(&order, session.role()))
}

/// Applies the reception form. The result must still identify the vehicle
/// by plates or VIN, otherwise nothing is saved.
pub async fn update_reception(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    update: ReceptionUpdate,
) -> Result<OrderDetail, ApiError> {
    let mut order = load_order(db, order_id).await?;
    update.apply(&mut order);
    validate_vehicle_identity(&order.vehicle).map_err(CoreError::from)?;

    let order = db.inner().orders().save(&order).await?;
    info!(id = %order.id, plates = %order.vehicle.plates, "Reception saved");
    Ok(OrderDetail::for_role(&order, session.role()))
}

/// Stores (or replaces) the photo for one inspection slot.
pub async fn set_inspection_photo(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
    slot: PhotoSlot,
    uri: &str,
    note: &str,
) -> Result<OrderDetail, ApiError> {
    if uri.trim().is_empty() {
        return Err(ApiError::validation("Photo URI is required"));
    }

    let mut order = load_order(db, order_id).await?;
    order.photos.retain(|p| p.slot != slot);
    order.photos.push(InspectionPhoto {
        slot,
        uri: uri.trim().to_string(),
        note: note.to_string(),
        timestamp: Utc::now(),
    });

    let order = db.inner().orders().save(&order).await?;
    Ok(OrderDetail::for_role(&order, session.role()))
}

/// Marks the vehicle as handed back to the client.
pub async fn deliver_order(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
) -> Result<OrderDetail, ApiError> {
    let mut order = load_order(db, order_id).await?;
    order.status = OrderStatus::Delivered;

    let order = db.inner().orders().save(&order).await?;
    info!(id = %order.id, "Work order delivered");
    Ok(OrderDetail::for_role(&order, session.role()))
}

pub async fn delete_order(db: &DbState, order_id: &str) -> Result<(), ApiError> {
    if !db.inner().orders().delete(order_id).await? {
        return Err(CoreError::OrderNotFound(order_id.to_string()).into());
    }
    info!(id = %order_id, "Work order deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
