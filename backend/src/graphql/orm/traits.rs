//! Core traits for the GraphQL ORM layer
//!
//! Entity modules implement these by hand: metadata for schema generation,
//! filter-to-SQL composition, ordering, and row decoding. The query builder
//! in [`builder`](super::builder) consumes them.

use sqlx::sqlite::SqliteRow;

/// Column definition for schema generation.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name in the database
    pub name: &'static str,
    /// SQLite column type (TEXT, INTEGER, REAL, BLOB)
    pub sql_type: &'static str,
    /// Whether the column can be NULL
    pub nullable: bool,
    /// Whether this is the primary key
    pub is_primary_key: bool,
    /// Default value expression (e.g., "datetime('now')")
    pub default: Option<&'static str>,
}

impl ColumnDef {
    /// Generate the column definition SQL
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);

        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if !self.nullable && !self.is_primary_key {
            sql.push_str(" NOT NULL");
        }

        if let Some(default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        sql
    }
}

/// Trait for database schema generation.
pub trait DatabaseSchema: DatabaseEntity {
    /// Get all column definitions for this entity's table
    fn columns() -> &'static [ColumnDef];

    /// Generate CREATE TABLE IF NOT EXISTS SQL
    fn create_table_sql() -> String {
        let column_defs: Vec<String> = Self::columns().iter().map(|c| c.to_sql()).collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            Self::TABLE_NAME,
            column_defs.join(",\n  ")
        )
    }
}

/// Metadata about a database entity (table).
pub trait DatabaseEntity: Sized + Send + Sync {
    /// The SQL table name (e.g., "customers")
    const TABLE_NAME: &'static str;

    /// The primary key column name (e.g., "id")
    const PRIMARY_KEY: &'static str;

    /// Default sort column for list queries
    const DEFAULT_SORT: &'static str;

    /// Default sort direction
    const DEFAULT_SORT_DIR: &'static str = "ASC";

    /// List of all column names in the table
    fn column_names() -> &'static [&'static str];

    /// Build a SELECT query for all columns
    fn select_sql() -> String {
        let columns = Self::column_names().join(", ");
        format!("SELECT {} FROM {}", columns, Self::TABLE_NAME)
    }
}

/// Trait for applying filters to a SQL query.
///
/// Implemented by the `*WhereInput` structs. Conditions are parameterized
/// fragments with `?` placeholders; `values` holds the bind values in the
/// same order the placeholders appear.
pub trait DatabaseFilter: Send + Sync {
    /// Apply this filter to a query builder, returning the WHERE clause fragments
    /// and the values to bind.
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>);

    /// Check if the filter has any conditions
    fn is_empty(&self) -> bool;
}

/// Trait for applying sort order to a SQL query.
///
/// Implemented by the `*OrderByInput` structs.
pub trait DatabaseOrderBy: Send + Sync {
    /// Get the ORDER BY clause fragment (e.g., "last_name ASC, created_at DESC")
    fn to_sql_order(&self) -> Option<String>;
}

/// Trait for decoding a database row into an entity.
pub trait FromSqlRow: Sized {
    /// Decode a SQLite row into this entity type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Sort direction for ORDER BY clauses.
#[derive(async_graphql::Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[graphql(name = "SortOrder")]
pub enum OrderDirection {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    #[graphql(name = "Asc")]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    #[graphql(name = "Desc")]
    Desc,
}

impl OrderDirection {
    /// Convert to SQL order string
    pub fn to_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Represents a SQL value that can be bound to a query.
///
/// Used by filters to collect values for parameterized queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

impl SqlValue {
    /// Bind this value to a sqlx query builder at the given parameter index
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
            SqlValue::Null => query.bind(None::<String>),
        }
    }
}
