//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, field validation, and the repository trait.

mod entity;
mod repository;
pub mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{is_email, is_string_in_range, matches};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
