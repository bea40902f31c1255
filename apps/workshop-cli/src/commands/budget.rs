//! # Budget Commands
//!
//! ```text
//! get_budget ─────────────┬── Admin    → AdminBudget (real costs, margins)
//!                         └── Mechanic → ClientQuote (sale side only)
//!
//! client_quote_html ──────┐
//! client_whatsapp_link ───┴── always ClientQuote, whoever asks
//! ```

use serde::Serialize;
use tracing::info;

use workshop_core::budget::ClientQuote;
use workshop_core::quote::{render_quote_html, share_quote_link};
use workshop_core::BudgetView;

use super::load_order;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};

/// Budget for the current role.
pub async fn get_budget(
    db: &DbState,
    session: &SessionState,
    order_id: &str,
) -> Result<BudgetView, ApiError> {
    let order = load_order(db, order_id).await?;
    Ok(BudgetView::for_role(&order, session.role()))
}

/// Printable quote document for the client.
pub async fn client_quote_html(
    db: &DbState,
    config: &ConfigState,
    order_id: &str,
) -> Result<String, ApiError> {
    let order = load_order(db, order_id).await?;
    let quote = ClientQuote::from_order(&order);
    Ok(render_quote_html(&order, &quote, &config.shop_name)?)
}

/// Share link result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub order_id: String,
    pub url: String,
}

/// WhatsApp link carrying the quote summary to the client's phone.
pub async fn client_whatsapp_link(
    db: &DbState,
    config: &ConfigState,
    order_id: &str,
) -> Result<ShareLink, ApiError> {
    let order = load_order(db, order_id).await?;
    let url = share_quote_link(&order, &config.shop_name, &config.country_code)?;

    info!(order_id = %order_id, "Quote share link built");
    Ok(ShareLink {
        order_id: order.id,
        url: url.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::{create_order, update_reception, ReceptionUpdate};
    use crate::commands::task::{add_task, update_task_costs, CostUpdate};
    use crate::commands::test_support::db_state;
    use crate::error::ErrorCode;
    use workshop_core::{Money, Role};

    /// Order with one task: sale 500 + 200, real 300 + 100.
    async fn priced_order(db: &DbState) -> String {
        let admin = SessionState::with_role(Role::Admin);
        let order = create_order(db, &admin).await.unwrap();
        update_reception(
            db,
            &admin,
            &order.id,
            ReceptionUpdate {
                plates: Some("ABC-123".to_string()),
                brand: Some("Nissan".to_string()),
                model: Some("Versa".to_string()),
                ..ReceptionUpdate::default()
            },
        )
        .await
        .unwrap();
        let detail = add_task(db, &admin, &order.id, "Frenos").await.unwrap();
        update_task_costs(
            db,
            &admin,
            &order.id,
            &detail.tasks[0].id,
            CostUpdate {
                sale_cost: Some("500".to_string()),
                labor_sale_cost: Some("200".to_string()),
                real_cost: Some("300".to_string()),
                labor_real_cost: Some("100".to_string()),
            },
        )
        .await
        .unwrap();
        order.id
    }

    #[tokio::test]
    async fn test_budget_follows_role() {
        let db = db_state().await;
        let order_id = priced_order(&db).await;

        let admin = get_budget(&db, &SessionState::with_role(Role::Admin), &order_id)
            .await
            .unwrap();
        match admin {
            BudgetView::Admin(budget) => {
                assert_eq!(budget.summary.total_sale, Money::from_cents(700_00));
                assert_eq!(budget.summary.total_real_cost, Money::from_cents(400_00));
                assert_eq!(budget.summary.margin, Money::from_cents(300_00));
            }
            other => panic!("expected admin view, got {:?}", other),
        }

        let mechanic = get_budget(&db, &SessionState::new(), &order_id).await.unwrap();
        assert!(matches!(mechanic, BudgetView::Client(_)));
        assert_eq!(mechanic.total_sale(), Money::from_cents(700_00));
    }

    #[tokio::test]
    async fn test_quote_html_has_no_cost_side() {
        let db = db_state().await;
        let order_id = priced_order(&db).await;

        let html = client_quote_html(&db, &ConfigState::default(), &order_id)
            .await
            .unwrap();
        assert!(html.contains("$700.00"));
        assert!(html.contains("ABC-123"));
        assert!(!html.contains("$300.00"));
        assert!(!html.contains("$400.00"));
    }

    #[tokio::test]
    async fn test_whatsapp_link_needs_phone() {
        let db = db_state().await;
        let order_id = priced_order(&db).await;
        let config = ConfigState::default();

        let err = client_whatsapp_link(&db, &config, &order_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        update_reception(
            &db,
            &SessionState::new(),
            &order_id,
            ReceptionUpdate {
                client_phone: Some("55 1234 5678".to_string()),
                ..ReceptionUpdate::default()
            },
        )
        .await
        .unwrap();

        let link = client_whatsapp_link(&db, &config, &order_id).await.unwrap();
        assert!(link.url.starts_with("whatsapp://send?phone=525512345678&text="));
    }
}
