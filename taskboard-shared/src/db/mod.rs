/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a health check
/// - `migrations`: Embedded schema migrations
///
/// Models live in the crate-level `models` module.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
