//! # Session State
//!
//! The role of whoever is using the device right now.
//!
//! The role gates what the command layer returns: budget views, task cost
//! columns, real-cost edits, PIN changes and exports. It starts as
//! `Mechanic` and only becomes `Admin` through a PIN check or a remembered
//! admin login.

use std::sync::{Arc, RwLock};

use tracing::debug;
use workshop_core::{CoreError, CoreResult, Role};
use workshop_db::AuthRepository;

/// Process-local session role.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    role: Arc<RwLock<Role>>,
}

impl SessionState {
    /// New session as a mechanic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session starting with `role`.
    pub fn with_role(role: Role) -> Self {
        SessionState {
            role: Arc::new(RwLock::new(role)),
        }
    }

    /// Restores the role from the remembered login.
    pub async fn restore(auth: &AuthRepository) -> Self {
        let role = if auth.is_admin().await {
            Role::Admin
        } else {
            Role::Mechanic
        };
        debug!(?role, "Session restored");
        Self::with_role(role)
    }

    /// Current role. A poisoned lock reads as `Mechanic`.
    pub fn role(&self) -> Role {
        self.role.read().map(|r| *r).unwrap_or_default()
    }

    pub fn set_role(&self, role: Role) {
        if let Ok(mut r) = self.role.write() {
            *r = role;
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    /// Fails with `AdminRequired` unless the session is admin.
    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::admin_required(action))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workshop_db::{Database, DbConfig};

    #[test]
    fn test_defaults_to_mechanic() {
        let session = SessionState::new();
        assert_eq!(session.role(), Role::Mechanic);
        assert!(session.require_admin("edit real costs").is_err());
    }

    #[test]
    fn test_role_changes_are_shared_between_clones() {
        let session = SessionState::new();
        let other = session.clone();
        session.set_role(Role::Admin);
        assert!(other.is_admin());
        assert!(other.require_admin("export").is_ok());
    }

    #[tokio::test]
    async fn test_restore_from_remembered_login() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let auth = db.auth();

        assert_eq!(SessionState::restore(&auth).await.role(), Role::Mechanic);

        assert!(auth.login_as_admin("1234").await);
        assert_eq!(SessionState::restore(&auth).await.role(), Role::Admin);

        auth.logout().await.unwrap();
        assert_eq!(SessionState::restore(&auth).await.role(), Role::Mechanic);
    }
}
