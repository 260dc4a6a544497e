//! In-memory identity of the signed-in user.

use std::sync::RwLock;

const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Clone, Debug, PartialEq, Eq)]
struct Identity {
    user_id: i64,
    name: String,
}

/// Who is signed in. How the identity was obtained or persisted is up to the host.
#[derive(Debug, Default)]
pub struct Session {
    identity: RwLock<Option<Identity>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(user_id: i64, name: impl Into<String>) -> Self {
        let session = Self::new();
        session.login_as(user_id, name);
        session
    }

    pub fn login_as(&self, user_id: i64, name: impl Into<String>) {
        let identity = Identity {
            user_id,
            name: name.into(),
        };
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = Some(identity);
    }

    /// Replaces the display name while keeping the user id. No-op when signed out.
    pub fn rename(&self, name: impl Into<String>) {
        let mut guard = self.identity.write().unwrap_or_else(|e| e.into_inner());
        if let Some(identity) = guard.as_mut() {
            identity.name = name.into();
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.identity
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|i| i.user_id)
    }

    pub fn display_name(&self) -> String {
        self.identity
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|i| i.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn clear(&self) {
        *self.identity.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
