//! PostgreSQL layer: row models, connection pool, embedded migrations, and
//! per-table query modules.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
