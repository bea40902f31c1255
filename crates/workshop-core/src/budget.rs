//! # Budget & Margin Engine
//!
//! Aggregates task costs into order totals and decides which of those
//! figures a given role may see.
//!
//! ## Two-Tier Read Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Who Sees What                                       │
//! │                                                                         │
//! │                        Mechanic / Client          Admin                 │
//! │  ───────────────────   ─────────────────────      ───────────────────   │
//! │  sale_cost                    ✅                      ✅                 │
//! │  labor_sale_cost              ✅                      ✅                 │
//! │  task subtotal                ✅                      ✅                 │
//! │  total_sale                   ✅                      ✅                 │
//! │  real_cost                    ❌                      ✅                 │
//! │  labor_real_cost              ❌                      ✅                 │
//! │  per-task margin              ❌                      ✅                 │
//! │  total_real_cost / margin     ❌                      ✅                 │
//! │  margin_percentage            ❌                      ✅                 │
//! │                                                                         │
//! │  compute_summary() ── role-agnostic, always computable                  │
//! │  BudgetView::for_role() ── the only place the split is applied          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ClientQuote` has no real-cost fields at all, so anything built from it
//! (HTML quote, WhatsApp message) cannot leak them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Role, WorkOrder, WorkTask};

// =============================================================================
// Summary
// =============================================================================

/// Order-level totals. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_sale: Money,
    pub total_real_cost: Money,
    /// `total_sale - total_real_cost`; negative is a loss.
    pub margin: Money,
    /// Margin as a percentage of `total_sale`, `0.0` when nothing was sold.
    pub margin_percentage: f64,
}

/// Computes order totals from its tasks.
///
/// ## Formula
/// ```text
/// total_sale        = Σ (sale_cost + labor_sale_cost)
/// total_real_cost   = Σ (real_cost + labor_real_cost)
/// margin            = total_sale − total_real_cost
/// margin_percentage = total_sale == 0 ? 0 : margin / total_sale × 100
/// ```
///
/// Pure and order-independent; cheap enough to call on every render.
///
/// ```rust
/// use workshop_core::budget::compute_summary;
///
/// let summary = compute_summary(&[]);
/// assert!(summary.total_sale.is_zero());
/// assert_eq!(summary.margin_percentage, 0.0);
/// ```
pub fn compute_summary(tasks: &[WorkTask]) -> BudgetSummary {
    let total_sale: Money = tasks.iter().map(WorkTask::sale_subtotal).sum();
    let total_real_cost: Money = tasks.iter().map(WorkTask::real_subtotal).sum();
    let margin = total_sale - total_real_cost;

    BudgetSummary {
        total_sale,
        total_real_cost,
        margin,
        margin_percentage: margin.percentage_of(total_sale),
    }
}

/// Profit of a single task: `(sale + labor_sale) − (real + labor_real)`.
pub fn per_task_margin(task: &WorkTask) -> Money {
    task.sale_subtotal() - task.real_subtotal()
}

/// How a margin should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MarginKind {
    /// Zero or positive.
    Profit,
    Loss,
}

impl MarginKind {
    pub fn of(margin: Money) -> Self {
        if margin.is_negative() {
            MarginKind::Loss
        } else {
            MarginKind::Profit
        }
    }
}

// =============================================================================
// Client View
// =============================================================================

/// One quote line as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientLine {
    pub task_id: String,
    pub description: String,
    /// Parts (refacciones).
    pub parts: Money,
    /// Labor (mano de obra).
    pub labor: Money,
    pub subtotal: Money,
}

/// Sale-side figures only. Safe to print, share, or show to a mechanic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuote {
    pub order_id: String,
    pub lines: Vec<ClientLine>,
    pub total_sale: Money,
}

impl ClientQuote {
    pub fn from_order(order: &WorkOrder) -> Self {
        let lines = order
            .tasks
            .iter()
            .map(|task| ClientLine {
                task_id: task.id.clone(),
                description: task.description.clone(),
                parts: task.sale_cost,
                labor: task.labor_sale_cost,
                subtotal: task.sale_subtotal(),
            })
            .collect::<Vec<_>>();

        let total_sale = lines.iter().map(|l| l.subtotal).sum();

        ClientQuote {
            order_id: order.id.clone(),
            lines,
            total_sale,
        }
    }
}

// =============================================================================
// Admin View
// =============================================================================

/// One budget line with both price columns and its margin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdminLine {
    pub task_id: String,
    pub description: String,
    pub parts_sale: Money,
    pub labor_sale: Money,
    pub subtotal: Money,
    pub parts_real: Money,
    pub labor_real: Money,
    pub margin: Money,
    pub margin_kind: MarginKind,
}

/// Full budget including real costs. Only built for the admin role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdminBudget {
    pub order_id: String,
    pub lines: Vec<AdminLine>,
    pub summary: BudgetSummary,
    pub margin_kind: MarginKind,
}

impl AdminBudget {
    fn from_order(order: &WorkOrder) -> Self {
        let lines = order
            .tasks
            .iter()
            .map(|task| {
                let margin = per_task_margin(task);
                AdminLine {
                    task_id: task.id.clone(),
                    description: task.description.clone(),
                    parts_sale: task.sale_cost,
                    labor_sale: task.labor_sale_cost,
                    subtotal: task.sale_subtotal(),
                    parts_real: task.real_cost,
                    labor_real: task.labor_real_cost,
                    margin,
                    margin_kind: MarginKind::of(margin),
                }
            })
            .collect();

        let summary = compute_summary(&order.tasks);

        AdminBudget {
            order_id: order.id.clone(),
            lines,
            summary,
            margin_kind: MarginKind::of(summary.margin),
        }
    }
}

// =============================================================================
// Role Dispatch
// =============================================================================

/// The budget as a particular role is allowed to see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum BudgetView {
    Client(ClientQuote),
    Admin(AdminBudget),
}

impl BudgetView {
    /// Builds the view for `role`. Mechanics get exactly what a client would.
    pub fn for_role(order: &WorkOrder, role: Role) -> Self {
        match role {
            Role::Admin => BudgetView::Admin(AdminBudget::from_order(order)),
            Role::Mechanic => BudgetView::Client(ClientQuote::from_order(order)),
        }
    }

    /// Sale total, visible to every role.
    pub fn total_sale(&self) -> Money {
        match self {
            BudgetView::Client(quote) => quote.total_sale,
            BudgetView::Admin(budget) => budget.summary.total_sale,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
