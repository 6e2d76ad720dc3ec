//! Storage infrastructure: connection pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::connect_pool;
