//! SQL Query Builder for the GraphQL ORM
//!
//! Provides a type-safe query builder that works with `DatabaseEntity` types
//! and uses parameterized queries via sqlx to prevent SQL injection.

use sqlx::SqlitePool;

use super::traits::{DatabaseEntity, DatabaseFilter, DatabaseOrderBy, FromSqlRow, SqlValue};

/// A query builder for database entities.
///
/// Builds parameterized SQL queries for SELECT operations with
/// filtering, sorting, and offset pagination support.
pub struct EntityQuery<E: DatabaseEntity> {
    _phantom: std::marker::PhantomData<E>,
    where_clauses: Vec<String>,
    values: Vec<SqlValue>,
    order_clauses: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    param_counter: usize,
}

impl<E: DatabaseEntity + FromSqlRow> EntityQuery<E> {
    /// Create a new query builder for the entity type.
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
            where_clauses: Vec::new(),
            values: Vec::new(),
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
            param_counter: 0,
        }
    }

    /// Add a filter to the query.
    pub fn filter<F: DatabaseFilter>(mut self, filter: &F) -> Self {
        if !filter.is_empty() {
            let (conditions, values) = filter.to_sql_conditions();
            for condition in conditions {
                let num_params = condition.matches('?').count();
                let rewritten = self.rewrite_params(&condition, num_params);
                self.where_clauses.push(rewritten);
            }
            self.values.extend(values);
        }
        self
    }

    /// Add a raw WHERE clause condition.
    pub fn where_clause(mut self, condition: &str, value: SqlValue) -> Self {
        self.param_counter += 1;
        let rewritten = condition.replace("?", &format!("?{}", self.param_counter));
        self.where_clauses.push(rewritten);
        self.values.push(value);
        self
    }

    /// Add sorting to the query.
    pub fn order_by<O: DatabaseOrderBy>(mut self, order: &O) -> Self {
        if let Some(order_sql) = order.to_sql_order() {
            self.order_clauses.push(order_sql);
        }
        self
    }

    /// Add default sorting if no order is specified.
    pub fn default_order(mut self) -> Self {
        if self.order_clauses.is_empty() {
            self.order_clauses
                .push(format!("{} {}", E::DEFAULT_SORT, E::DEFAULT_SORT_DIR));
        }
        self
    }

    /// Set the row limit (the `take` argument).
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the row offset (the `skip` argument).
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Rewrite parameter placeholders to use sequential indices.
    fn rewrite_params(&mut self, condition: &str, num_new_params: usize) -> String {
        let mut result = condition.to_string();
        // Replace each bare ? with ?N where N is the parameter index
        for _i in 0..num_new_params {
            self.param_counter += 1;
            if let Some(pos) = result.find('?') {
                // Check if it's not already numbered (e.g., ?1)
                let next_char = result.chars().nth(pos + 1);
                if next_char.is_none() || !next_char.unwrap().is_ascii_digit() {
                    result = format!(
                        "{}?{}{}",
                        &result[..pos],
                        self.param_counter,
                        &result[pos + 1..]
                    );
                }
            }
        }
        result
    }

    /// Build the SQL query string.
    ///
    /// Public so tests can assert the exact statement handed to the executor.
    pub fn to_sql(&self) -> String {
        let mut sql = E::select_sql();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            if offset > 0 {
                // SQLite requires LIMIT when OFFSET is present
                if self.limit.is_none() {
                    sql.push_str(" LIMIT -1");
                }
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }

        sql
    }

    /// The bind values accompanying [to_sql](Self::to_sql), in placeholder order.
    pub fn bind_values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Build a COUNT query string.
    fn build_count_sql(&self) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {}", E::TABLE_NAME);

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        sql
    }

    /// Execute the query and return all matching entities.
    pub async fn fetch_all(self, pool: &SqlitePool) -> Result<Vec<E>, sqlx::Error> {
        let sql = self.to_sql();
        tracing::debug!(sql = %sql, "Executing entity query");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        let rows = query.fetch_all(pool).await?;
        rows.iter().map(E::from_row).collect()
    }

    /// Execute the query and return a single optional entity.
    pub async fn fetch_optional(self, pool: &SqlitePool) -> Result<Option<E>, sqlx::Error> {
        let sql = self.to_sql();
        tracing::debug!(sql = %sql, "Executing entity query (one)");

        let mut query = sqlx::query(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        match query.fetch_optional(pool).await? {
            Some(row) => Ok(Some(E::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Execute a COUNT query.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let sql = self.build_count_sql();
        tracing::debug!(sql = %sql, "Executing count query");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &self.values {
            query = match value {
                SqlValue::String(s) => query.bind(s.as_str()),
                SqlValue::Int(i) => query.bind(*i),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
                SqlValue::Null => query.bind(None::<String>),
            };
        }

        query.fetch_one(pool).await
    }
}

impl<E: DatabaseEntity + FromSqlRow> Default for EntityQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute an INSERT/UPDATE/DELETE query with bound values.
/// This helper properly handles the sqlx query lifetime requirements.
pub async fn execute_with_binds(
    sql: &str,
    values: &[SqlValue],
    pool: &SqlitePool,
) -> Result<sqlx::sqlite::SqliteQueryResult, sqlx::Error> {
    tracing::debug!(sql = %sql, "Executing statement");

    let mut q = sqlx::query(sql);
    for v in values {
        q = match v {
            SqlValue::String(s) => q.bind(s.as_str()),
            SqlValue::Int(i) => q.bind(*i),
            SqlValue::Float(f) => q.bind(*f),
            SqlValue::Bool(b) => q.bind(if *b { 1i32 } else { 0i32 }),
            SqlValue::Null => q.bind(None::<String>),
        };
    }
    q.execute(pool).await
}
