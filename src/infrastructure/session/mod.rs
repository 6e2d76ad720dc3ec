//! Session infrastructure: token generation and session stores

mod generator;
mod in_memory;
mod postgres;

pub use generator::SessionTokenGenerator;
pub use in_memory::InMemorySessionStore;
pub use postgres::PostgresSessionStore;
