//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, ping, run_migrations, DatabaseConfig};

// Re-export PgPool for convenience
pub use sqlx::migrate::MigrateError;
pub use sqlx::postgres::PgPool;
