//! Database connection and schema management

use std::path::Path;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::graphql::entities::{Address, Customer, Order, Payment, Product};
use crate::graphql::orm::DatabaseSchema;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool.
    ///
    /// Accepts either a plain file path or a `sqlite:` URL. The database
    /// file (and its parent directory) is created if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = if url.starts_with("sqlite:") {
            url.parse::<SqliteConnectOptions>()?
        } else {
            if let Some(parent) = Path::new(url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            SqliteConnectOptions::new().filename(url)
        }
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database with the schema applied.
    #[cfg(test)]
    pub async fn connect_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create any tables that do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        for sql in [
            Address::create_table_sql(),
            Product::create_table_sql(),
            Customer::create_table_sql(),
            Order::create_table_sql(),
            Payment::create_table_sql(),
        ] {
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrate_creates_all_entity_tables() {
        let db = Database::connect_memory().await.unwrap();

        for table in ["addresses", "products", "customers", "orders", "payments"] {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            )
            .bind(table)
            .fetch_one(db.pool())
            .await
            .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn payment_table_uses_integer_primary_key() {
        let sql = Payment::create_table_sql();
        assert!(sql.contains("id INTEGER PRIMARY KEY"), "sql was: {sql}");
    }
}
