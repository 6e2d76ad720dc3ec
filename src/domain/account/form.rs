//! Typed form submissions for the account pages

use serde::Deserialize;

use super::errors::{FormErrors, FormField};
use crate::domain::user::validation::{
    is_email, is_string_in_range, matches, NAME_MAX_LENGTH, NAME_MIN_LENGTH,
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};

pub const INVALID_REGISTRATION_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_LOGIN_EMAIL: &str = "Please enter a valid email";
pub const INVALID_GIVEN_NAME: &str = "Given Name must be between 2 and 50 characters";
pub const INVALID_FAMILY_NAME: &str = "Family Name must be between 2 and 50 characters";
pub const INVALID_PASSWORD: &str = "Password must be at least 6 characters";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Registration form as submitted
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Registration fields that passed validation
#[derive(Clone, Copy)]
pub struct ValidRegistration<'a> {
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub nickname: &'a str,
    pub email: &'a str,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub password: &'a str,
}

impl RegistrationForm {
    /// Trim the text inputs and treat blank ones as absent; passwords are
    /// kept exactly as typed
    pub fn normalized(self) -> Self {
        Self {
            given_name: clean(self.given_name),
            family_name: clean(self.family_name),
            nickname: clean(self.nickname),
            email: clean(self.email),
            city: clean(self.city),
            state: clean(self.state),
            password: self.password,
            password_confirmation: self.password_confirmation,
        }
    }

    /// Nickname, falling back to the given name
    pub fn effective_nickname(&self) -> Option<&str> {
        self.nickname.as_deref().or(self.given_name.as_deref())
    }

    /// Check every rule and collect all failures
    pub fn validate(&self) -> Result<ValidRegistration<'_>, FormErrors> {
        let mut errors = FormErrors::new();

        if !is_email(self.email.as_deref()) {
            errors.insert(FormField::Email, INVALID_REGISTRATION_EMAIL);
        }

        if !is_string_in_range(self.given_name.as_deref(), NAME_MIN_LENGTH, NAME_MAX_LENGTH) {
            errors.insert(FormField::GivenName, INVALID_GIVEN_NAME);
        }

        if !is_string_in_range(self.family_name.as_deref(), NAME_MIN_LENGTH, NAME_MAX_LENGTH) {
            errors.insert(FormField::FamilyName, INVALID_FAMILY_NAME);
        }

        if !is_string_in_range(
            self.password.as_deref(),
            PASSWORD_MIN_LENGTH,
            PASSWORD_MAX_LENGTH,
        ) {
            errors.insert(FormField::Password, INVALID_PASSWORD);
        }

        if !matches(
            self.password.as_deref(),
            self.password_confirmation.as_deref(),
        ) {
            errors.insert(FormField::PasswordConfirmation, PASSWORD_MISMATCH);
        }

        match (
            self.given_name.as_deref(),
            self.family_name.as_deref(),
            self.email.as_deref(),
            self.password.as_deref(),
        ) {
            (Some(given_name), Some(family_name), Some(email), Some(password))
                if errors.is_empty() =>
            {
                Ok(ValidRegistration {
                    given_name,
                    family_name,
                    nickname: self.nickname.as_deref().unwrap_or(given_name),
                    email,
                    city: self.city.as_deref(),
                    state: self.state.as_deref(),
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

impl std::fmt::Debug for ValidRegistration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("given_name", &self.given_name)
            .field("family_name", &self.family_name)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("given_name", &self.given_name)
            .field("family_name", &self.family_name)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("password", &redacted(&self.password))
            .field(
                "password_confirmation",
                &redacted(&self.password_confirmation),
            )
            .finish()
    }
}

/// Login form as submitted
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Credentials that passed shape validation
#[derive(Clone, Copy)]
pub struct ValidLogin<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl LoginForm {
    pub fn normalized(self) -> Self {
        Self {
            email: clean(self.email),
            password: self.password,
        }
    }

    /// Check the email format and password length, collecting both failures
    pub fn validate(&self) -> Result<ValidLogin<'_>, FormErrors> {
        let mut errors = FormErrors::new();

        if !is_email(self.email.as_deref()) {
            errors.insert(FormField::Email, INVALID_LOGIN_EMAIL);
        }

        if !is_string_in_range(
            self.password.as_deref(),
            PASSWORD_MIN_LENGTH,
            PASSWORD_MAX_LENGTH,
        ) {
            errors.insert(FormField::Password, INVALID_PASSWORD);
        }

        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(ValidLogin { email, password }),
            _ => Err(errors),
        }
    }
}

impl std::fmt::Debug for ValidLogin<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidLogin")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "[REDACTED]")
}
