//! Domain layer - Core business logic and entities

pub mod account;
pub mod error;
pub mod session;
pub mod user;

pub use account::{AccountOutcome, AccountResponse, FormErrors, FormField, View, ViewName};
pub use error::DomainError;
pub use session::{Session, SessionChange, SessionRecord, SessionStore, SessionToken, SessionUser};
pub use user::{NewUser, User, UserId, UserRepository};
