//! # Auth Commands
//!
//! The admin PIN gate. A PIN check either succeeds or it doesn't; the
//! caller only learns `success: false`, never why.

use serde::Serialize;
use tracing::info;

use workshop_core::Role;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Result of a login attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
}

/// Checks the admin PIN and switches the session to admin on a match.
pub async fn login(
    db: &DbState,
    session: &SessionState,
    pin: &str,
) -> Result<LoginResponse, ApiError> {
    let success = db.inner().auth().login_as_admin(pin).await;
    if success {
        session.set_role(Role::Admin);
    }

    Ok(LoginResponse {
        success,
        role: session.role(),
    })
}

pub async fn login_as_mechanic(
    db: &DbState,
    session: &SessionState,
) -> Result<LoginResponse, ApiError> {
    db.inner().auth().login_as_mechanic().await?;
    session.set_role(Role::Mechanic);

    Ok(LoginResponse {
        success: true,
        role: Role::Mechanic,
    })
}

/// Forgets the remembered login. The session drops back to mechanic.
pub async fn logout(db: &DbState, session: &SessionState) -> Result<(), ApiError> {
    db.inner().auth().logout().await?;
    session.set_role(Role::Mechanic);
    info!("Logged out");
    Ok(())
}

pub fn current_role(session: &SessionState) -> Role {
    session.role()
}

/// Replaces the admin PIN. Admin only.
pub async fn change_admin_pin(
    db: &DbState,
    session: &SessionState,
    new_pin: &str,
) -> Result<(), ApiError> {
    session.require_admin("change the admin PIN")?;
    db.inner().auth().set_admin_pin(new_pin).await?;
    info!("Admin PIN changed");
    Ok(())
}
