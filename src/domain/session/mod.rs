//! Session domain
//!
//! The session is an explicit value handed to each account operation and
//! handed back with the outcome. Persistence lives behind [`SessionStore`].

mod entity;
mod store;
mod token;

pub use entity::{Session, SessionChange, SessionUser};
pub use store::{SessionRecord, SessionStore};
pub use token::SessionToken;
