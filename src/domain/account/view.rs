//! What the account workflow hands to the view layer

use serde::Serialize;

use super::errors::FormErrors;
use super::form::{LoginForm, RegistrationForm};
use crate::domain::session::SessionUser;

/// Templates the application renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    Register,
    Login,
    Home,
    Dashboard,
}

/// Submitted values echoed back into a re-rendered form
///
/// Password fields have no slot here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormEcho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl FormEcho {
    pub fn from_registration(form: &RegistrationForm) -> Self {
        Self {
            given_name: form.given_name.clone(),
            family_name: form.family_name.clone(),
            nickname: form.effective_nickname().map(str::to_string),
            email: form.email.clone(),
            city: form.city.clone(),
            state: form.state.clone(),
        }
    }

    pub fn from_login(form: &LoginForm) -> Self {
        Self {
            email: form.email.clone(),
            ..Default::default()
        }
    }
}

/// A template plus the data it is rendered with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub name: ViewName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FormErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<FormEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<SessionUser>,
}

impl View {
    pub fn new(name: ViewName) -> Self {
        Self {
            name,
            errors: None,
            user: None,
            current_user: None,
        }
    }

    pub fn with_errors(mut self, errors: FormErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_user(mut self, user: FormEcho) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_current_user(mut self, user: Option<SessionUser>) -> Self {
        self.current_user = user;
        self
    }

    /// Error message for a field, if any
    pub fn error(&self, field: super::FormField) -> Option<&str> {
        self.errors.as_ref().and_then(|errors| errors.get(field))
    }
}
