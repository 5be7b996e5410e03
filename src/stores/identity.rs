//! Identity store: the registry of self-asserted identities, the current
//! session, and the admin/blocked flag sets.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{Session, UserAccount};
use crate::storage::{slots, SlotStore};

const SLOT: &str = slots::AUTH;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityState {
    current: Option<String>,
    /// Every email ever seen, in first-login order.
    registered: Vec<String>,
    admins: Vec<String>,
    blocked: Vec<String>,
}

impl IdentityState {
    fn session_for(&self, email: &str) -> Session {
        Session {
            email: email.to_string(),
            is_admin: self.admins.iter().any(|a| a == email),
            is_blocked: self.blocked.iter().any(|b| b == email),
        }
    }

    fn register(&mut self, email: &str) {
        if !self.registered.iter().any(|r| r == email) {
            self.registered.push(email.to_string());
        }
    }
}

/// Identity service. Identities are never removed, only re-flagged.
pub struct IdentityStore {
    state: RwLock<IdentityState>,
    slots: SlotStore,
    /// Seeded from config; the one admin that cannot be demoted.
    bootstrap_admin: String,
}

impl IdentityStore {
    /// Restore the snapshot and make sure the bootstrap admin exists.
    pub async fn open(store: SlotStore, admin_email: &str) -> Result<Self, AppError> {
        let mut state: IdentityState = store.read_slot_or_default(SLOT).await?;
        state.register(admin_email);
        if !state.admins.iter().any(|a| a == admin_email) {
            state.admins.push(admin_email.to_string());
        }
        store.write_slot(SLOT, &state).await?;
        Ok(Self {
            state: RwLock::new(state),
            slots: store,
            bootstrap_admin: admin_email.to_string(),
        })
    }

    /// Sign in, registering the email on first sight.
    pub async fn login(&self, email: &str) -> Result<Session, AppError> {
        let mut state = self.state.write().await;
        state.register(email);
        state.current = Some(email.to_string());
        self.persist(&state).await?;
        Ok(state.session_for(email))
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.current = None;
        self.persist(&state).await
    }

    /// The current session, if anyone is signed in.
    pub async fn session(&self) -> Option<Session> {
        let state = self.state.read().await;
        state.current.as_deref().map(|email| state.session_for(email))
    }

    /// Grant admin. Reports false when the email already had it.
    pub async fn promote(&self, email: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.admins.iter().any(|a| a == email) {
            return Ok(false);
        }
        state.register(email);
        state.admins.push(email.to_string());
        self.persist(&state).await?;
        Ok(true)
    }

    /// Revoke admin. The bootstrap admin keeps it no matter what.
    pub async fn demote(&self, email: &str) -> Result<bool, AppError> {
        if email == self.bootstrap_admin {
            return Err(AppError::Forbidden(
                "The built-in admin account cannot be demoted".to_string(),
            ));
        }
        let mut state = self.state.write().await;
        let before = state.admins.len();
        state.admins.retain(|a| a != email);
        if state.admins.len() == before {
            return Ok(false);
        }
        self.persist(&state).await?;
        Ok(true)
    }

    /// Block an identity. Reports false when it was already blocked.
    pub async fn block(&self, email: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.blocked.iter().any(|b| b == email) {
            return Ok(false);
        }
        state.register(email);
        state.blocked.push(email.to_string());
        self.persist(&state).await?;
        Ok(true)
    }

    pub async fn unblock(&self, email: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.blocked.len();
        state.blocked.retain(|b| b != email);
        if state.blocked.len() == before {
            return Ok(false);
        }
        self.persist(&state).await?;
        Ok(true)
    }

    /// Registry view for the admin table, with the viewer's row marked.
    pub async fn all_users(&self) -> Vec<UserAccount> {
        let state = self.state.read().await;
        state
            .registered
            .iter()
            .map(|email| {
                let session = state.session_for(email);
                UserAccount {
                    email: session.email,
                    is_admin: session.is_admin,
                    is_blocked: session.is_blocked,
                    is_current_user: state.current.as_deref() == Some(email.as_str()),
                }
            })
            .collect()
    }

    async fn persist(&self, state: &IdentityState) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, state).await
    }
}
