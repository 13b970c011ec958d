use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::keys::session_key;
use crate::store::kv::SharedStore;

pub const DEFAULT_ALLOWED_USERS: &[&str] = &["aio", "jalil"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Lowercased, trimmed name. Partitions every persisted record.
    pub id: String,
    pub name: String,
}

impl User {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self {
            id: name.to_lowercase(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter your name")]
    EmptyName,
    #[error("Access denied. Please contact administrator.")]
    AccessDenied,
}

/// Name gate against an allow-list. This keeps learners' records apart; it
/// is not access control.
pub fn login<S: AsRef<str>>(name: &str, allow_list: &[S]) -> Result<User, LoginError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LoginError::EmptyName);
    }
    let id = trimmed.to_lowercase();
    if !allow_list.iter().any(|allowed| allowed.as_ref().to_lowercase() == id) {
        tracing::info!(name = trimmed, "login refused");
        return Err(LoginError::AccessDenied);
    }
    tracing::info!(user_id = %id, "logged in");
    Ok(User::from_name(trimmed))
}

/// The remembered current user.
pub struct Session {
    store: SharedStore,
    key: String,
}

impl Session {
    pub fn new(store: SharedStore, namespace: &str) -> Self {
        Self {
            store,
            key: session_key(namespace),
        }
    }

    /// A corrupt stored session is removed and treated as logged out.
    pub fn restore(&self) -> Option<User> {
        let raw = self.store.get(&self.key)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse user session");
                if let Err(e) = self.store.remove(&self.key) {
                    tracing::warn!(error = %e, "failed to remove corrupt session");
                }
                None
            }
        }
    }

    pub fn remember(&self, user: &User) {
        let saved = serde_json::to_string(user)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = saved {
            tracing::warn!(error = %e, "failed to save user session");
        }
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(error = %e, "failed to clear user session");
        }
    }
}
