//! Infrastructure layer - Storage adapters, hashing and logging

pub mod logging;
pub mod session;
pub mod storage;
pub mod user;
