//! Session value passed through the account workflow

use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserId};

/// Identity attributes kept in the session for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl SessionUser {
    /// Profile captured right after registration
    pub fn from_registration(user: &User) -> Self {
        Self {
            id: user.id(),
            given_name: user.given_name().to_string(),
            family_name: Some(user.family_name().to_string()),
            nickname: Some(user.nickname().to_string()),
            email: user.email().to_string(),
            city: user.city().map(str::to_string),
            state: user.state().map(str::to_string),
        }
    }

    /// Reduced profile captured on login
    pub fn from_login(user: &User) -> Self {
        Self {
            id: user.id(),
            given_name: user.given_name().to_string(),
            family_name: None,
            nickname: None,
            email: user.email().to_string(),
            city: user.city().map(str::to_string),
            state: user.state().map(str::to_string),
        }
    }

    /// Nickname when known, given name otherwise
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.given_name)
    }
}

/// What happened to the session during a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionChange {
    /// Read only; nothing to persist
    #[default]
    Unchanged,
    /// A user was stored; persist under a fresh token
    Established,
    /// All state was dropped; destroy and expire the cookie
    Cleared,
}

/// Per-request session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<SessionUser>,
    change: SessionChange,
}

impl Session {
    /// A session with no identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session loaded from the store
    pub fn restored(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            change: SessionChange::Unchanged,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn change(&self) -> SessionChange {
        self.change
    }

    /// Store the authenticated identity
    pub fn set_user(&mut self, user: SessionUser) {
        self.user = Some(user);
        self.change = SessionChange::Established;
    }

    /// Drop every key
    pub fn clear_all(&mut self) {
        self.user = None;
        self.change = SessionChange::Cleared;
    }
}
