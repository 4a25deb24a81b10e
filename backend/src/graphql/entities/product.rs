//! Product entity

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::Database;
use crate::graphql::filters::{DateTimeFilter, FloatFilter, StringFilter};
use crate::graphql::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseOrderBy, DatabaseSchema, EntityQuery,
    FromSqlRow, OrderDirection, SqlValue,
};
use crate::graphql::queries::page_args;

use super::order::{Order, OrderOrderByInput, OrderWhereInput};

/// Product entity - an item in the catalog.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[graphql(name = "Product", complex)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub item_price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Product {
    /// Orders containing this product
    async fn orders(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<OrderWhereInput>,
        order_by: Option<Vec<OrderOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Order>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;

        let mut query = EntityQuery::<Order>::new()
            .where_clause("orders.product_id = ?", SqlValue::String(self.id.clone()));
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        for order in order_by.iter().flatten() {
            query = query.order_by(order);
        }
        query = query.default_order();
        if let Some(skip) = skip {
            query = query.offset(skip);
        }
        if let Some(take) = take {
            query = query.limit(take);
        }

        Ok(query.fetch_all(db.pool()).await?)
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "id",
        sql_type: "TEXT",
        nullable: false,
        is_primary_key: true,
        default: None,
    },
    ColumnDef {
        name: "name",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "description",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "item_price",
        sql_type: "REAL",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "created_at",
        sql_type: "TEXT",
        nullable: false,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "updated_at",
        sql_type: "TEXT",
        nullable: false,
        is_primary_key: false,
        default: None,
    },
];

impl DatabaseEntity for Product {
    const TABLE_NAME: &'static str = "products";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "created_at";

    fn column_names() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "description",
            "item_price",
            "created_at",
            "updated_at",
        ]
    }
}

impl DatabaseSchema for Product {
    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }
}

impl FromSqlRow for Product {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            item_price: row.try_get("item_price")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Filter over product scalar fields.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "ProductWhereInput")]
pub struct ProductWhereInput {
    pub id: Option<StringFilter>,
    pub name: Option<StringFilter>,
    pub description: Option<StringFilter>,
    pub item_price: Option<FloatFilter>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
}

impl DatabaseFilter for ProductWhereInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(filter) = &self.id {
            let (c, v) = filter.sql_conditions("products.id");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.name {
            let (c, v) = filter.sql_conditions("products.name");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.description {
            let (c, v) = filter.sql_conditions("products.description");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.item_price {
            let (c, v) = filter.sql_conditions("products.item_price");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.created_at {
            let (c, v) = filter.sql_conditions("products.created_at");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.updated_at {
            let (c, v) = filter.sql_conditions("products.updated_at");
            conditions.extend(c);
            values.extend(v);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Unique selector for a single product.
#[derive(InputObject, Clone, Debug)]
#[graphql(name = "ProductWhereUniqueInput")]
pub struct ProductWhereUniqueInput {
    pub id: String,
}

impl DatabaseFilter for ProductWhereUniqueInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            vec!["products.id = ?".to_string()],
            vec![SqlValue::String(self.id.clone())],
        )
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Sort selector for product list queries.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "ProductOrderByInput")]
pub struct ProductOrderByInput {
    pub id: Option<OrderDirection>,
    pub name: Option<OrderDirection>,
    pub description: Option<OrderDirection>,
    pub item_price: Option<OrderDirection>,
    pub created_at: Option<OrderDirection>,
    pub updated_at: Option<OrderDirection>,
}

impl DatabaseOrderBy for ProductOrderByInput {
    fn to_sql_order(&self) -> Option<String> {
        let fields = [
            ("id", self.id),
            ("name", self.name),
            ("description", self.description),
            ("item_price", self.item_price),
            ("created_at", self.created_at),
            ("updated_at", self.updated_at),
        ];
        let clauses: Vec<String> = fields
            .iter()
            .filter_map(|(col, dir)| dir.map(|d| format!("{} {}", col, d.to_sql())))
            .collect();
        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(", "))
        }
    }
}

/// Input for creating a product.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "ProductCreateInput")]
pub struct ProductCreateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub item_price: Option<f64>,
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "ProductUpdateInput")]
pub struct ProductUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub item_price: Option<f64>,
}
