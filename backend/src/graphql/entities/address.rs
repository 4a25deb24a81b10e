//! Address entity

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

use super::customer::{Customer, CustomerOrderByInput, CustomerWhereInput};

/// Address entity - a postal address shared by customers.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[graphql(name = "Address", complex)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Address {
    /// Customers registered at this address
    async fn customers(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<CustomerWhereInput>,
        order_by: Option<Vec<CustomerOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Customer>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;

        let mut query = EntityQuery::<Customer>::new().where_clause(
            "customers.address_id = ?",
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
        name: "address_1",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "address_2",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "city",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "state",
        sql_type: "TEXT",
        nullable: true,
        is_primary_key: false,
        default: None,
    },
    ColumnDef {
        name: "zip",
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

impl DatabaseEntity for Address {
    const TABLE_NAME: &'static str = "addresses";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "created_at";

    fn column_names() -> &'static [&'static str] {
        &[
            "id",
            "address_1",
            "address_2",
            "city",
            "state",
            "zip",
            "created_at",
            "updated_at",
        ]
    }
}

impl DatabaseSchema for Address {
    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }
}

impl FromSqlRow for Address {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            address_1: row.try_get("address_1")?,
            address_2: row.try_get("address_2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            zip: row.try_get("zip")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Filter over address scalar fields.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "AddressWhereInput")]
pub struct AddressWhereInput {
    pub id: Option<StringFilter>,
    pub address_1: Option<StringFilter>,
    pub address_2: Option<StringFilter>,
    pub city: Option<StringFilter>,
    pub state: Option<StringFilter>,
    pub zip: Option<StringFilter>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
}

impl DatabaseFilter for AddressWhereInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        let fields: [(&str, Option<&StringFilter>); 6] = [
            ("addresses.id", self.id.as_ref()),
            ("addresses.address_1", self.address_1.as_ref()),
            ("addresses.address_2", self.address_2.as_ref()),
            ("addresses.city", self.city.as_ref()),
            ("addresses.state", self.state.as_ref()),
            ("addresses.zip", self.zip.as_ref()),
        ];
        for (column, filter) in fields {
            if let Some(filter) = filter {
                let (c, v) = filter.sql_conditions(column);
                conditions.extend(c);
                values.extend(v);
            }
        }
        if let Some(filter) = &self.created_at {
            let (c, v) = filter.sql_conditions("addresses.created_at");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.updated_at {
            let (c, v) = filter.sql_conditions("addresses.updated_at");
            conditions.extend(c);
            values.extend(v);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Unique selector for a single address.
#[derive(InputObject, Clone, Debug)]
#[graphql(name = "AddressWhereUniqueInput")]
pub struct AddressWhereUniqueInput {
    pub id: String,
}

impl DatabaseFilter for AddressWhereUniqueInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            vec!["addresses.id = ?".to_string()],
            vec![SqlValue::String(self.id.clone())],
        )
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Sort selector for address list queries.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "AddressOrderByInput")]
pub struct AddressOrderByInput {
    pub id: Option<OrderDirection>,
    pub address_1: Option<OrderDirection>,
    pub address_2: Option<OrderDirection>,
    pub city: Option<OrderDirection>,
    pub state: Option<OrderDirection>,
    pub zip: Option<OrderDirection>,
    pub created_at: Option<OrderDirection>,
    pub updated_at: Option<OrderDirection>,
}

impl DatabaseOrderBy for AddressOrderByInput {
    fn to_sql_order(&self) -> Option<String> {
        let fields = [
            ("id", self.id),
            ("address_1", self.address_1),
            ("address_2", self.address_2),
            ("city", self.city),
            ("state", self.state),
            ("zip", self.zip),
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

/// Input for creating an address.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "AddressCreateInput")]
pub struct AddressCreateInput {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Input for updating an address. Absent fields are left unchanged.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "AddressUpdateInput")]
pub struct AddressUpdateInput {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}
