//! # Export Command
//!
//! Daily JSON backup. The document carries real costs, so only an admin
//! session may produce it.

use chrono::{NaiveDate, Utc};
use tracing::info;

use workshop_core::quote;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Pretty-printed backup of the orders created on `date` (UTC), today by
/// default.
pub async fn export_daily(
    db: &DbState,
    session: &SessionState,
    date: Option<NaiveDate>,
) -> Result<String, ApiError> {
    session.require_admin("export orders")?;

    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let orders = db.inner().orders().list_created_on(date).await?;

    let json = quote::export_daily(&orders, date)
        .map_err(|e| ApiError::internal(format!("Export serialization failed: {}", e)))?;

    info!(%date, orders = orders.len(), "Daily export generated");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::order::create_order;
    use crate::error::ErrorCode;
    use crate::commands::test_support::db_state;
    use workshop_core::Role;

    #[tokio::test]
    async fn test_export_is_admin_only() {
        let db = db_state().await;
        let err = export_daily(&db, &SessionState::new(), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_export_today() {
        let db = db_state().await;
        let admin = SessionState::with_role(Role::Admin);
        let order = create_order(&db, &admin).await.unwrap();

        let json = export_daily(&db, &admin, Some(order.created_at.date_naive()))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalOrders"], 1);
        assert_eq!(value["orders"][0]["id"], order.id.as_str());

        let empty = export_daily(&db, &admin, NaiveDate::from_ymd_opt(2001, 1, 1))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&empty).unwrap();
        assert_eq!(value["totalOrders"], 0);
        assert_eq!(value["exportDate"], "2001-01-01");
    }
}
