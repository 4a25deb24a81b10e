//! Customer entity

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::Database;
use crate::graphql::filters::{DateTimeFilter, StringFilter};
use crate::graphql::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseOrderBy, DatabaseSchema, EntityQuery,
    FromSqlRow, OrderDirection, SqlValue,
};
use crate::graphql::queries::page_args;

use super::address::{Address, AddressWhereUniqueInput};
use super::order::{Order, OrderOrderByInput, OrderWhereInput};
use super::payment::{Payment, PaymentOrderByInput, PaymentWhereInput};

/// Customer entity - an account that places orders and registers payments.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[graphql(name = "Customer", complex)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[graphql(skip)]
    #[serde(skip)]
    pub address_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Customer {
    /// The customer's address
    async fn address(&self, ctx: &Context<'_>) -> Result<Option<Address>> {
        let Some(address_id) = &self.address_id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Address>::new()
            .where_clause("addresses.id = ?", SqlValue::String(address_id.clone()))
            .fetch_optional(db.pool())
            .await?)
    }

    /// Orders placed by this customer
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
            .where_clause("orders.customer_id = ?", SqlValue::String(self.id.clone()));
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

    /// Payments registered by this customer
    async fn payments(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<PaymentWhereInput>,
        order_by: Option<Vec<PaymentOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Payment>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;

        let mut query = EntityQuery::<Payment>::new().where_clause(
            "payments.customer_id = ?",
            SqlValue::String(self.id.clone()),
        );
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
        name: "first_name",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "last_name",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "email",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "phone",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "address_id",
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

impl DatabaseEntity for Customer {
    const TABLE_NAME: &'static str = "customers";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "created_at";

    fn column_names() -> &'static [&'static str] {
        &[
            "id",
            "first_name",
            "last_name",
            "email",
            "phone",
            "address_id",
            "created_at",
            "updated_at",
        ]
    }
}

impl DatabaseSchema for Customer {
    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }
}

impl FromSqlRow for Customer {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address_id: row.try_get("address_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Filter over customer scalar fields.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "CustomerWhereInput")]
pub struct CustomerWhereInput {
    pub id: Option<StringFilter>,
    pub first_name: Option<StringFilter>,
    pub last_name: Option<StringFilter>,
    pub email: Option<StringFilter>,
    pub phone: Option<StringFilter>,
    pub address: Option<AddressWhereUniqueInput>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
}

impl DatabaseFilter for CustomerWhereInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        let fields: [(&str, Option<&StringFilter>); 5] = [
            ("customers.id", self.id.as_ref()),
            ("customers.first_name", self.first_name.as_ref()),
            ("customers.last_name", self.last_name.as_ref()),
            ("customers.email", self.email.as_ref()),
            ("customers.phone", self.phone.as_ref()),
        ];
        for (column, filter) in fields {
            if let Some(filter) = filter {
                let (c, v) = filter.sql_conditions(column);
                conditions.extend(c);
                values.extend(v);
            }
        }
        if let Some(address) = &self.address {
            conditions.push("customers.address_id = ?".to_string());
            values.push(SqlValue::String(address.id.clone()));
        }
        if let Some(filter) = &self.created_at {
            let (c, v) = filter.sql_conditions("customers.created_at");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.updated_at {
            let (c, v) = filter.sql_conditions("customers.updated_at");
            conditions.extend(c);
            values.extend(v);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Unique selector for a single customer.
#[derive(InputObject, Clone, Debug)]
#[graphql(name = "CustomerWhereUniqueInput")]
pub struct CustomerWhereUniqueInput {
    pub id: String,
}

impl DatabaseFilter for CustomerWhereUniqueInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            vec!["customers.id = ?".to_string()],
            vec![SqlValue::String(self.id.clone())],
        )
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Sort selector for customer list queries.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "CustomerOrderByInput")]
pub struct CustomerOrderByInput {
    pub id: Option<OrderDirection>,
    pub first_name: Option<OrderDirection>,
    pub last_name: Option<OrderDirection>,
    pub email: Option<OrderDirection>,
    pub phone: Option<OrderDirection>,
    pub address_id: Option<OrderDirection>,
    pub created_at: Option<OrderDirection>,
    pub updated_at: Option<OrderDirection>,
}

impl DatabaseOrderBy for CustomerOrderByInput {
    fn to_sql_order(&self) -> Option<String> {
        let fields = [
            ("id", self.id),
            ("first_name", self.first_name),
            ("last_name", self.last_name),
            ("email", self.email),
            ("phone", self.phone),
            ("address_id", self.address_id),
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

/// Input for creating a customer.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "CustomerCreateInput")]
pub struct CustomerCreateInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressWhereUniqueInput>,
}

/// Input for updating a customer. Absent fields are left unchanged.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "CustomerUpdateInput")]
pub struct CustomerUpdateInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressWhereUniqueInput>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn where_input_qualifies_every_column() {
        let filter = CustomerWhereInput {
            email: Some(StringFilter::contains("@example.com")),
            address: Some(AddressWhereUniqueInput {
                id: "addr-1".to_string(),
            }),
            ..Default::default()
        };
        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "customers.email LIKE ? ESCAPE '\\'".to_string(),
                "customers.address_id = ?".to_string(),
            ]
        );
        assert_eq!(
            values,
            vec![
                SqlValue::String("%@example.com%".to_string()),
                SqlValue::String("addr-1".to_string()),
            ]
        );
    }

    #[test]
    fn order_by_follows_field_declaration_order() {
        let order = CustomerOrderByInput {
            last_name: Some(OrderDirection::Asc),
            created_at: Some(OrderDirection::Desc),
            ..Default::default()
        };
        assert_eq!(
            order.to_sql_order(),
            Some("last_name ASC, created_at DESC".to_string())
        );
    }

    #[test]
    fn empty_order_by_produces_no_clause() {
        assert_eq!(CustomerOrderByInput::default().to_sql_order(), None);
    }
}
