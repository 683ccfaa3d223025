//! Common library for the furniture shop
//!
//! This crate provides the storage plumbing used by the shop service:
//! database configuration and connectivity, schema migrations for the user
//! collection, and the shared error type.

pub mod database;
pub mod error;
pub mod migrations;

/// Example usage of the database module
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, init_pool, health_check};
/// use common::migrations::Migrator;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::default();
///     let pool = init_pool(&config).await?;
///     let is_healthy = health_check(&pool).await?;
///     println!("Database health check: {}", is_healthy);
///     Migrator::new(config.collection_name()?).run_pending(&pool).await?;
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
