//! Payment entity

use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::Database;
use crate::graphql::filters::{DateTimeFilter, IntFilter};
use crate::graphql::orm::{
    ColumnDef, DatabaseEntity, DatabaseFilter, DatabaseOrderBy, DatabaseSchema, EntityQuery,
    FromSqlRow, OrderDirection, SqlValue,
};

use super::customer::{Customer, CustomerWhereUniqueInput};

/// How a payment was made.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[graphql(name = "EnumPaymentPaymentType")]
pub enum PaymentType {
    #[graphql(name = "Card")]
    #[serde(rename = "Card")]
    Card,
    #[graphql(name = "Cash")]
    #[serde(rename = "Cash")]
    Cash,
    #[graphql(name = "Paypal")]
    #[serde(rename = "Paypal")]
    Paypal,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Card => "Card",
            PaymentType::Cash => "Cash",
            PaymentType::Paypal => "Paypal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Card" => Some(PaymentType::Card),
            "Cash" => Some(PaymentType::Cash),
            "Paypal" => Some(PaymentType::Paypal),
            _ => None,
        }
    }
}

/// Payment entity - a payment method registered by a customer.
#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
#[graphql(name = "Payment", complex)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub payment_type: Option<PaymentType>,
    #[graphql(skip)]
    #[serde(skip)]
    pub customer_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl Payment {
    /// The customer this payment belongs to
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
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "id",
        sql_type: "INTEGER",
        nullable: false,
        is_primary_key: true,
        default: None,
    },
    ColumnDef {
        name: "payment_type",
        sql_type: "TEXT",
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

impl DatabaseEntity for Payment {
    const TABLE_NAME: &'static str = "payments";
    const PRIMARY_KEY: &'static str = "id";
    const DEFAULT_SORT: &'static str = "created_at";

    fn column_names() -> &'static [&'static str] {
        &["id", "payment_type", "customer_id", "created_at", "updated_at"]
    }
}

impl DatabaseSchema for Payment {
    fn columns() -> &'static [ColumnDef] {
        COLUMNS
    }
}

impl FromSqlRow for Payment {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let payment_type = match row.try_get::<Option<String>, _>("payment_type")? {
            Some(raw) => Some(PaymentType::parse(&raw).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown payment type: {raw}").into())
            })?),
            None => None,
        };
        Ok(Self {
            id: row.try_get("id")?,
            payment_type,
            customer_id: row.try_get("customer_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Filter over payment scalar fields.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "PaymentWhereInput")]
pub struct PaymentWhereInput {
    pub id: Option<IntFilter>,
    pub payment_type: Option<PaymentType>,
    pub customer: Option<CustomerWhereUniqueInput>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
}

impl DatabaseFilter for PaymentWhereInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(filter) = &self.id {
            let (c, v) = filter.sql_conditions("payments.id");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(payment_type) = &self.payment_type {
            conditions.push("payments.payment_type = ?".to_string());
            values.push(SqlValue::String(payment_type.as_str().to_string()));
        }
        if let Some(customer) = &self.customer {
            conditions.push("payments.customer_id = ?".to_string());
            values.push(SqlValue::String(customer.id.clone()));
        }
        if let Some(filter) = &self.created_at {
            let (c, v) = filter.sql_conditions("payments.created_at");
            conditions.extend(c);
            values.extend(v);
        }
        if let Some(filter) = &self.updated_at {
            let (c, v) = filter.sql_conditions("payments.updated_at");
            conditions.extend(c);
            values.extend(v);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Unique selector for a single payment.
#[derive(InputObject, Clone, Debug)]
#[graphql(name = "PaymentWhereUniqueInput")]
pub struct PaymentWhereUniqueInput {
    pub id: i64,
}

impl DatabaseFilter for PaymentWhereUniqueInput {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        (
            vec!["payments.id = ?".to_string()],
            vec![SqlValue::Int(self.id)],
        )
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// Sort selector for payment list queries.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "PaymentOrderByInput")]
pub struct PaymentOrderByInput {
    pub id: Option<OrderDirection>,
    pub payment_type: Option<OrderDirection>,
    pub customer_id: Option<OrderDirection>,
    pub created_at: Option<OrderDirection>,
    pub updated_at: Option<OrderDirection>,
}

impl DatabaseOrderBy for PaymentOrderByInput {
    fn to_sql_order(&self) -> Option<String> {
        let fields = [
            ("id", self.id),
            ("payment_type", self.payment_type),
            ("customer_id", self.customer_id),
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

/// Input for creating a payment.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "PaymentCreateInput")]
pub struct PaymentCreateInput {
    pub payment_type: Option<PaymentType>,
    pub customer: Option<CustomerWhereUniqueInput>,
}

/// Input for updating a payment. Absent fields are left unchanged.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "PaymentUpdateInput")]
pub struct PaymentUpdateInput {
    pub payment_type: Option<PaymentType>,
    pub customer: Option<CustomerWhereUniqueInput>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn payment_type_round_trips_through_storage_text() {
        for pt in [PaymentType::Card, PaymentType::Cash, PaymentType::Paypal] {
            assert_eq!(PaymentType::parse(pt.as_str()), Some(pt));
        }
        assert_eq!(PaymentType::parse("Wire"), None);
    }

    #[test]
    fn payment_type_filter_compares_stored_text() {
        let filter = PaymentWhereInput {
            payment_type: Some(PaymentType::Cash),
            ..Default::default()
        };
        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(conditions, vec!["payments.payment_type = ?".to_string()]);
        assert_eq!(values, vec![SqlValue::String("Cash".to_string())]);
    }
}
