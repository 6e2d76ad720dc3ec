//! Account domain
//!
//! Form types, field-keyed errors, view data and outcomes shared by the
//! registration, login and logout operations.

mod errors;
mod form;
mod outcome;
mod view;

pub use errors::{FormErrors, FormField};
pub use form::{
    LoginForm, RegistrationForm, ValidLogin, ValidRegistration, INVALID_FAMILY_NAME,
    INVALID_GIVEN_NAME, INVALID_LOGIN_EMAIL, INVALID_PASSWORD, INVALID_REGISTRATION_EMAIL,
    PASSWORD_MISMATCH,
};
pub use outcome::{AccountOutcome, AccountResponse};
pub use view::{FormEcho, View, ViewName};

/// Landing page after registration
pub const HOME_PATH: &str = "/";
/// Landing page after login
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Where logout sends the browser
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Shared by the unknown-email and wrong-password paths
pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials";
pub const EMAIL_TAKEN: &str = "That email already exists";
