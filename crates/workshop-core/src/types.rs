//! # Domain Types
//!
//! Core domain types used throughout Workshop Manager.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │    WorkOrder     │   │     WorkTask     │   │   VehicleInfo    │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id (YYMMDD-NN)  │──►│  id (UUID)       │   │  vin, plates     │    │
//! │  │  status          │   │  status (kanban) │   │  brand, model    │    │
//! │  │  vehicle, client │   │  sale / real $   │   │  year, odometer  │    │
//! │  │  photos[6]       │   │  evidence photos │   └──────────────────┘    │
//! │  └──────────────────┘   └──────────────────┘                           │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │   OrderStatus    │   │    TaskStatus    │   │       Role       │    │
//! │  │  Reception       │   │  Pending         │   │  Admin           │    │
//! │  │  InProgress      │   │  InProgress      │   │  Mechanic        │    │
//! │  │  Completed       │   │  Completed       │   └──────────────────┘    │
//! │  │  Delivered       │   └──────────────────┘                           │
//! │  └──────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps are passed in by the caller (`now`) so every method here stays
//! deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Statuses
// =============================================================================

/// Lifecycle of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Vehicle checked in, inspection in progress.
    #[default]
    Reception,
    /// At least one task is being worked on.
    InProgress,
    /// Every task is finished.
    Completed,
    /// Vehicle handed back to the client.
    Delivered,
}

impl OrderStatus {
    /// Label shown on badges and documents.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Reception => "Recepción",
            OrderStatus::InProgress => "En Proceso",
            OrderStatus::Completed => "Finalizado",
            OrderStatus::Delivered => "Entregado",
        }
    }
}

/// Kanban column of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Kanban columns in board order.
    pub const COLUMNS: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendiente",
            TaskStatus::InProgress => "En Proceso",
            TaskStatus::Completed => "Finalizado",
        }
    }
}

// =============================================================================
// Role & Auth
// =============================================================================

/// Who is holding the device.
///
/// Only `Admin` may see real costs and margins. Mechanics see the same
/// sale-side figures a client would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Mechanic,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Persisted login record.
///
/// This is a convenience flag for restoring the last session, not a
/// credential store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub role: Role,
    pub pin: String,
}

impl AuthState {
    /// Record written after a successful admin PIN check.
    pub fn admin(pin: impl Into<String>) -> Self {
        AuthState {
            is_authenticated: true,
            role: Role::Admin,
            pin: pin.into(),
        }
    }

    /// Record written when someone enters as a mechanic.
    pub fn mechanic() -> Self {
        AuthState {
            is_authenticated: true,
            role: Role::Mechanic,
            pin: String::new(),
        }
    }
}

// =============================================================================
// Photos
// =============================================================================

/// The six mandatory inspection angles taken at reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    Front,
    Rear,
    Left,
    Right,
    InteriorFront,
    InteriorRear,
}

impl PhotoSlot {
    pub const ALL: [PhotoSlot; 6] = [
        PhotoSlot::Front,
        PhotoSlot::Rear,
        PhotoSlot::Left,
        PhotoSlot::Right,
        PhotoSlot::InteriorFront,
        PhotoSlot::InteriorRear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PhotoSlot::Front => "Frontal",
            PhotoSlot::Rear => "Trasera",
            PhotoSlot::Left => "Lateral Izquierdo",
            PhotoSlot::Right => "Lateral Derecho",
            PhotoSlot::InteriorFront => "Interior Frontal",
            PhotoSlot::InteriorRear => "Interior Trasero",
        }
    }
}

/// A reception photo for one inspection slot.
///
/// `uri` points at wherever the camera picker stored the image; an empty
/// `uri` means the slot has not been captured yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPhoto {
    pub slot: PhotoSlot,
    pub uri: String,
    pub note: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

/// Evidence photo attached to a task while it is being worked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskPhoto {
    pub id: String,
    pub uri: String,
    pub note: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Vehicle
// =============================================================================

/// Vehicle data captured at reception. All fields are free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleInfo {
    pub vin: String,
    pub plates: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub engine: String,
    pub odometer: String,
}

// =============================================================================
// Work Task
// =============================================================================

/// One billable unit of work within an order.
///
/// ## Two Price Columns
/// ```text
///                 parts              labor
/// client sees:    sale_cost          labor_sale_cost
/// admin sees:     real_cost          labor_real_cost
/// ```
/// Nothing forces `real_cost <= sale_cost`; a task sold below cost is a
/// valid loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WorkTask {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Order this task belongs to.
    pub order_id: String,
    pub description: String,
    pub status: TaskStatus,
    pub mechanic_name: String,
    pub hours_worked: f64,
    /// Parts price quoted to the client.
    #[serde(default)]
    pub sale_cost: Money,
    /// Labor price quoted to the client.
    #[serde(default)]
    pub labor_sale_cost: Money,
    /// What the parts actually cost the shop. Admin only.
    #[serde(default)]
    pub real_cost: Money,
    /// What the labor actually cost the shop. Admin only.
    #[serde(default)]
    pub labor_real_cost: Money,
    #[serde(default)]
    pub evidence_photos: Vec<TaskPhoto>,
    #[serde(default)]
    pub notes: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl WorkTask {
    /// Creates an empty pending task with a fresh UUID and zero costs.
    pub fn new(order_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        WorkTask {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            mechanic_name: String::new(),
            hours_worked: 0.0,
            sale_cost: Money::zero(),
            labor_sale_cost: Money::zero(),
            real_cost: Money::zero(),
            labor_real_cost: Money::zero(),
            evidence_photos: Vec::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Parts plus labor, as quoted to the client.
    #[inline]
    pub fn sale_subtotal(&self) -> Money {
        self.sale_cost + self.labor_sale_cost
    }

    /// Parts plus labor, as paid by the shop.
    #[inline]
    pub fn real_subtotal(&self) -> Money {
        self.real_cost + self.labor_real_cost
    }
}

// =============================================================================
// Work Order
// =============================================================================

/// One vehicle's repair job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    /// Daily sequential ID, `YYMMDD-NN`.
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default)]
    pub vehicle: VehicleInfo,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub reason_for_visit: String,
    #[serde(default)]
    pub photos: Vec<InspectionPhoto>,
    #[serde(default)]
    pub tasks: Vec<WorkTask>,
}

impl WorkOrder {
    /// Creates an empty order in reception.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        WorkOrder {
            id: id.into(),
            created_at: now,
            updated_at: now,
            status: OrderStatus::Reception,
            vehicle: VehicleInfo::default(),
            client_name: String::new(),
            client_phone: String::new(),
            reason_for_visit: String::new(),
            photos: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn find_task(&self, task_id: &str) -> Option<&WorkTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Replaces the task with the same ID, or appends it.
    ///
    /// The order status follows the board afterwards:
    /// ```text
    /// any task InProgress           → InProgress
    /// all tasks Completed (and ≥1)  → Completed
    /// otherwise                     → unchanged
    /// ```
    pub fn upsert_task(&mut self, mut task: WorkTask, now: DateTime<Utc>) {
        task.order_id = self.id.clone();
        task.updated_at = now;

        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }

        self.refresh_status();
        self.updated_at = now;
    }

    /// Removes a task. Returns `false` when no task had that ID.
    pub fn remove_task(&mut self, task_id: &str, now: DateTime<Utc>) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        let removed = self.tasks.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Moves a task to another kanban column.
    ///
    /// Returns `false` when no task had that ID.
    pub fn move_task(&mut self, task_id: &str, status: TaskStatus, now: DateTime<Utc>) -> bool {
        let Some(task) = self.find_task(task_id).cloned() else {
            return false;
        };
        self.upsert_task(WorkTask { status, ..task }, now);
        true
    }

    /// Tasks in one kanban column, in insertion order.
    pub fn tasks_in(&self, status: TaskStatus) -> impl Iterator<Item = &WorkTask> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// Number of inspection slots with a captured photo.
    pub fn photos_completed(&self) -> usize {
        PhotoSlot::ALL
            .iter()
            .filter(|slot| self.photo_for(**slot).is_some())
            .count()
    }

    /// Inspection slots still waiting for a photo.
    pub fn missing_photo_slots(&self) -> Vec<PhotoSlot> {
        PhotoSlot::ALL
            .into_iter()
            .filter(|slot| self.photo_for(*slot).is_none())
            .collect()
    }

    /// Captured photo for a slot, ignoring placeholders with an empty URI.
    pub fn photo_for(&self, slot: PhotoSlot) -> Option<&InspectionPhoto> {
        self.photos
            .iter()
            .find(|p| p.slot == slot && !p.uri.trim().is_empty())
    }

    fn refresh_status(&mut self) {
        if self.tasks.iter().any(|t| t.status == TaskStatus::InProgress) {
            self.status = OrderStatus::InProgress;
        } else if !self.tasks.is_empty()
            && self.tasks.iter().all(|t| t.status == TaskStatus::Completed)
        {
            self.status = OrderStatus::Completed;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_new_order_defaults() {
        let order = WorkOrder::new("250615-01", now());
        assert_eq!(order.status, OrderStatus::Reception);
        assert!(order.tasks.is_empty());
        assert!(order.photos.is_empty());
        assert_eq!(order.vehicle, VehicleInfo::default());
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_new_task_defaults() {
        let task = WorkTask::new("250615-01", now());
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.sale_cost.is_zero());
        assert!(task.labor_sale_cost.is_zero());
        assert!(task.real_cost.is_zero());
        assert!(task.labor_real_cost.is_zero());
        assert_eq!(task.hours_worked, 0.0);
        assert!(uuid::Uuid::parse_str(&task.id).is_ok());

        let other = WorkTask::new("250615-01", now());
        assert_ne!(task.id, other.id);
    }

    #[test]
    fn test_upsert_replaces_existing_task() {
        let t = now();
        let mut order = WorkOrder::new("250615-01", t);
        let mut task = WorkTask::new("ignored", t);
        order.upsert_task(task.clone(), t);
        assert_eq!(order.tasks.len(), 1);
        assert_eq!(order.tasks[0].order_id, "250615-01");

        task.description = "Cambio de balatas".to_string();
        order.upsert_task(task, t);
        assert_eq!(order.tasks.len(), 1);
        assert_eq!(order.tasks[0].description, "Cambio de balatas");
    }

    #[test]
    fn test_status_follows_board() {
        let t = now();
        let mut order = WorkOrder::new("250615-01", t);
        let a = WorkTask::new(&order.id, t);
        let b = WorkTask::new(&order.id, t);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());

        order.upsert_task(a, t);
        order.upsert_task(b, t);
        assert_eq!(order.status, OrderStatus::Reception);

        assert!(order.move_task(&a_id, TaskStatus::InProgress, t));
        assert_eq!(order.status, OrderStatus::InProgress);

        assert!(order.move_task(&a_id, TaskStatus::Completed, t));
        // b is still pending: status stays where it was
        assert_eq!(order.status, OrderStatus::InProgress);

        assert!(order.move_task(&b_id, TaskStatus::Completed, t));
        assert_eq!(order.status, OrderStatus::Completed);

        assert!(!order.move_task("missing", TaskStatus::Pending, t));
    }

    #[test]
    fn test_kanban_columns() {
        let t = now();
        let mut order = WorkOrder::new("250615-01", t);
        let mut done = WorkTask::new(&order.id, t);
        done.status = TaskStatus::Completed;
        order.upsert_task(done, t);
        order.upsert_task(WorkTask::new(&order.id, t), t);
        order.upsert_task(WorkTask::new(&order.id, t), t);

        assert_eq!(order.tasks_in(TaskStatus::Pending).count(), 2);
        assert_eq!(order.tasks_in(TaskStatus::InProgress).count(), 0);
        assert_eq!(order.tasks_in(TaskStatus::Completed).count(), 1);
    }

    #[test]
    fn test_remove_task() {
        let t = now();
        let mut order = WorkOrder::new("250615-01", t);
        let task = WorkTask::new(&order.id, t);
        let id = task.id.clone();
        order.upsert_task(task, t);

        assert!(order.remove_task(&id, t));
        assert!(order.tasks.is_empty());
        assert!(!order.remove_task(&id, t));
    }

    #[test]
    fn test_photo_completion_ignores_empty_uri() {
        let t = now();
        let mut order = WorkOrder::new("250615-01", t);
        order.photos.push(InspectionPhoto {
            slot: PhotoSlot::Front,
            uri: "file:///front.jpg".to_string(),
            note: String::new(),
            timestamp: t,
        });
        order.photos.push(InspectionPhoto {
            slot: PhotoSlot::Rear,
            uri: String::new(),
            note: "pendiente".to_string(),
            timestamp: t,
        });

        assert_eq!(order.photos_completed(), 1);
        let missing = order.missing_photo_slots();
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&PhotoSlot::Rear));
        assert!(!missing.contains(&PhotoSlot::Front));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::default(), Role::Mechanic);

        let state = AuthState::admin("1234");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"isAuthenticated":true,"role":"admin","pin":"1234"}"#
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(OrderStatus::InProgress.label(), "En Proceso");
        assert_eq!(OrderStatus::Delivered.label(), "Entregado");
        assert_eq!(TaskStatus::Pending.label(), "Pendiente");
        assert_eq!(PhotoSlot::InteriorRear.label(), "Interior Trasero");
    }
}
