//! # Auth Repository
//!
//! The admin PIN and the remembered login, both kept in the kv store.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login_as_admin("1234")                                                 │
//! │       │                                                                 │
//! │       ├── get_admin_pin() ──► stored "admin_pin" or "1234"              │
//! │       │                                                                 │
//! │       ├── mismatch ──► false  (nothing written)                         │
//! │       │                                                                 │
//! │       └── match ──► write workshop_auth {admin} ──► true                │
//! │                                                                         │
//! │  get_auth_state() ──► stored record, or a logged-out mechanic when the  │
//! │                       record is missing or unreadable                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This gates what the shop floor sees on a shared device. It is not a
//! credential store: the PIN sits in plain text next to the login record.

use tracing::{debug, warn};

use workshop_core::validation::validate_pin;
use workshop_core::{AuthState, DEFAULT_ADMIN_PIN};

use crate::error::DbResult;
use crate::repository::kv::KvRepository;

/// kv key of the remembered login.
pub const AUTH_KEY: &str = "workshop_auth";

/// kv key of the admin PIN.
pub const ADMIN_PIN_KEY: &str = "admin_pin";

/// Repository for the admin gate.
#[derive(Debug, Clone)]
pub struct AuthRepository {
    kv: KvRepository,
}

impl AuthRepository {
    pub fn new(kv: KvRepository) -> Self {
        AuthRepository { kv }
    }

    /// Remembered login. Never fails: missing or corrupt records read as a
    /// logged-out mechanic.
    pub async fn get_auth_state(&self) -> AuthState {
        match self.kv.get_json::<AuthState>(AUTH_KEY).await {
            Ok(Some(state)) => state,
            Ok(None) => AuthState::default(),
            Err(err) => {
                warn!(error = %err, "Unreadable login record, defaulting to mechanic");
                AuthState::default()
            }
        }
    }

    /// Current admin PIN, `"1234"` until one is set or when it cannot be read.
    pub async fn get_admin_pin(&self) -> String {
        match self.kv.get(ADMIN_PIN_KEY).await {
            Ok(Some(pin)) => pin,
            Ok(None) => DEFAULT_ADMIN_PIN.to_string(),
            Err(err) => {
                warn!(error = %err, "Could not read admin PIN, using default");
                DEFAULT_ADMIN_PIN.to_string()
            }
        }
    }

    /// Replaces the admin PIN. Rejects anything but 4-6 digits.
    pub async fn set_admin_pin(&self, pin: &str) -> DbResult<()> {
        validate_pin(pin)?;
        self.kv.set(ADMIN_PIN_KEY, pin).await?;
        debug!("Admin PIN changed");
        Ok(())
    }

    /// Checks `pin` and, on a match, remembers the admin login.
    ///
    /// A wrong or malformed PIN is a plain `false`. A failure to persist the
    /// login is logged; the PIN was still correct, so the result is `true`.
    pub async fn login_as_admin(&self, pin: &str) -> bool {
        if validate_pin(pin).is_err() {
            return false;
        }
        if pin != self.get_admin_pin().await {
            debug!("Admin PIN rejected");
            return false;
        }

        if let Err(err) = self.kv.set_json(AUTH_KEY, &AuthState::admin(pin)).await {
            warn!(error = %err, "Could not persist admin login");
        }
        true
    }

    /// Remembers a mechanic login.
    pub async fn login_as_mechanic(&self) -> DbResult<()> {
        self.kv.set_json(AUTH_KEY, &AuthState::mechanic()).await
    }

    /// Forgets the remembered login.
    pub async fn logout(&self) -> DbResult<()> {
        self.kv.remove(AUTH_KEY).await?;
        Ok(())
    }

    /// Whether the remembered login is an authenticated admin.
    pub async fn is_admin(&self) -> bool {
        let state = self.get_auth_state().await;
        state.is_authenticated && state.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use workshop_core::Role;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_default_pin_is_1234() {
        let auth = db().await.auth();
        assert_eq!(auth.get_admin_pin().await, "1234");
        assert!(auth.login_as_admin("1234").await);
        assert!(auth.is_admin().await);
    }

    #[tokio::test]
    async fn test_wrong_pin_is_false_and_writes_nothing() {
        let db = db().await;
        let auth = db.auth();

        assert!(!auth.login_as_admin("0000").await);
        assert!(!auth.login_as_admin("12").await);
        assert!(!auth.login_as_admin("abcd").await);
        assert!(!auth.is_admin().await);
        assert_eq!(db.kv().get(AUTH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_changed_pin() {
        let auth = db().await.auth();
        auth.set_admin_pin("987654").await.unwrap();

        assert!(!auth.login_as_admin("1234").await);
        assert!(auth.login_as_admin("987654").await);
    }

    #[tokio::test]
    async fn test_set_admin_pin_validates() {
        let auth = db().await.auth();
        let err = auth.set_admin_pin("12").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(auth.set_admin_pin("12ab").await.is_err());
        assert_eq!(auth.get_admin_pin().await, "1234");
    }

    #[tokio::test]
    async fn test_auth_state_defaults_and_recovers_from_garbage() {
        let db = db().await;
        let auth = db.auth();

        let state = auth.get_auth_state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.role, Role::Mechanic);

        db.kv().set(AUTH_KEY, "{{{").await.unwrap();
        assert_eq!(auth.get_auth_state().await, AuthState::default());
    }

    #[tokio::test]
    async fn test_mechanic_login_and_logout() {
        let auth = db().await.auth();
        assert!(auth.login_as_admin("1234").await);

        auth.login_as_mechanic().await.unwrap();
        let state = auth.get_auth_state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.role, Role::Mechanic);
        assert!(!auth.is_admin().await);

        auth.logout().await.unwrap();
        assert!(!auth.get_auth_state().await.is_authenticated);
    }
}
