//! Order entity

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::Database;
use crate::graphql::filters::{DateTimeFilter, FloatFilter, IntFilter, StringFilter};
use crate::graphql::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseOrderBy, DatabaseSchema, EntityQuery,
    FromSqlRow, OrderDirection, SqlValue,
};

use super::customer::{Customer, CustomerWhereUniqueInput};
use super::product::{Product, ProductWhereUniqueInput};

/// Order entity - a purchase of a product by a customer.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[graphql(name = "Order", complex)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub quantity: Option<i64>,
    pub discount: Option<f64>,
    pub total_price: Option<i64>,
    #[graphql(skip)]
    #[serde(skip)]
    pub customer_id: Option<String>,
    #[graphql(skip)]
    #[serde(skip)]
    pub product_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Order {
    /// The customer who placed this order
    async fn customer(&self, ctx: &Context<'_>) -> Result<Option<Customer>> {
        let Some(customer_id) = &self.customer_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Customer>::new()
            .where_clause("customers.id = ?", SqlValue::String(customer_id.clone()))
            .fetch_optional(db.pool())
            .await?)
    }

    /// The product this order is for
    async fn product(&self, ctx: &Context<'_>) -> Result<Option<Product>> {
        let Some(product_id) = &self.product_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Product>::new()
            .where_clause("products.id = ?", SqlValue::String(product_id.clone()))
            .fetch_optional(db.pool())
            .await?)
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
        name: "quantity",
        sql_type: "INTEGER",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "discount",
        sql_type: "REAL",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "total_price",
        sql_type: "INTEGER",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "customer_id",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "product_id",
        sql_type: "TEXT",
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

impl DatabaseEntity for Order {
    const TABLE_NAME: &'static str = "orders";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "created_at";

    fn column_names() -> &'static [&'static str] {
        &[
            "id",
            "quantity",
            "discount",
            "total_price",
            "customer_id",
            "product_id",
            "created_at",
            "updated_at",
        ]
    }
}

impl DatabaseSchema for Order {
    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }
}

impl FromSqlRow for Order {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            quantity: row.try_get("quantity")?,
            discount: row.try_get("discount")?,
            total_price: row.try_get("total_price")?,
            customer_id: row.try_get("customer_id")?,
            product_id: row.try_get("product_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Filter over order scalar fields. Relations match by foreign key only.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "OrderWhereInput")]
pub struct OrderWhereInput {
    pub id: Option<StringFilter>,
    pub quantity: Option<IntFilter>,
    pub discount: Option<FloatFilter>,
    pub total_price: Option<IntFilter>,
    pub customer: Option<CustomerWhereUniqueInput>,
    pub product: Option<ProductWhereUniqueInput>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
}

impl DatabaseFilter for OrderWhereInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(filter) = &self.id {
            let (c, v) = filter.sql_conditions("orders.id");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.quantity {
            let (c, v) = filter.sql_conditions("orders.quantity");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.discount {
            let (c, v) = filter.sql_conditions("orders.discount");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.total_price {
            let (c, v) = filter.sql_conditions("orders.total_price");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(customer) = &self.customer {
            conditions.push("orders.customer_id = ?".to_string());
            values.push(SqlValue::String(customer.id.clone()));
        }
        if let Some(product) = &self.product {
            conditions.push("orders.product_id = ?".to_string());
            values.push(SqlValue::String(product.id.clone()));
        }
        if let Some(filter) = &self.created_at {
            let (c, v) = filter.sql_conditions("orders.created_at");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.updated_at {
            let (c, v) = filter.sql_conditions("orders.updated_at");
            conditions.extend(c);
            values.extend(v);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Unique selector for a single order.
#[derive(InputObject, Clone, Debug)]
#[graphql(name = "OrderWhereUniqueInput")]
pub struct OrderWhereUniqueInput {
    pub id: String,
}

impl DatabaseFilter for OrderWhereUniqueInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            vec!["orders.id = ?".to_string()],
            vec![SqlValue::String(self.id.clone())],
        )
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Sort selector for order list queries.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "OrderOrderByInput")]
pub struct OrderOrderByInput {
    pub id: Option<OrderDirection>,
    pub quantity: Option<OrderDirection>,
    pub discount: Option<OrderDirection>,
    pub total_price: Option<OrderDirection>,
    pub customer_id: Option<OrderDirection>,
    pub product_id: Option<OrderDirection>,
    pub created_at: Option<OrderDirection>,
    pub updated_at: Option<OrderDirection>,
}

impl DatabaseOrderBy for OrderOrderByInput {
    fn to_sql_order(&self) -> Option<String> {
        let fields = [
            ("id", self.id),
            ("quantity", self.quantity),
            ("discount", self.discount),
            ("total_price", self.total_price),
            ("customer_id", self.customer_id),
            ("product_id", self.product_id),
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

/// Input for creating an order.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "OrderCreateInput")]
pub struct OrderCreateInput {
    pub quantity: Option<i64>,
    pub discount: Option<f64>,
    pub total_price: Option<i64>,
    pub customer: Option<CustomerWhereUniqueInput>,
    pub product: Option<ProductWhereUniqueInput>,
}

/// Input for updating an order. Absent fields are left unchanged.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "OrderUpdateInput")]
pub struct OrderUpdateInput {
    pub quantity: Option<i64>,
    pub discount: Option<f64>,
    pub total_price: Option<i64>,
    pub customer: Option<CustomerWhereUniqueInput>,
    pub product: Option<ProductWhereUniqueInput>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn where_input_combines_scalar_and_relation_conditions() {
        let filter = OrderWhereInput {
            quantity: Some(IntFilter::gte(2)),
            customer: Some(CustomerWhereUniqueInput {
                id: "cust-1".to_string(),
            }),
            ..Default::default()
        };
        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "orders.quantity >= ?".to_string(),
                "orders.customer_id = ?".to_string(),
            ]
        );
        assert_eq!(
            values,
            vec![SqlValue::Int(2), SqlValue::String("cust-1".to_string())]
        );
    }

    #[test]
    fn unique_input_matches_primary_key_only() {
        let unique = OrderWhereUniqueInput {
            id: "order-9".to_string(),
        };
        let (conditions, values) = unique.to_sql_conditions();
        assert_eq!(conditions, vec!["orders.id = ?".to_string()]);
        assert_eq!(values, vec![SqlValue::String("order-9".to_string())]);
    }
}
