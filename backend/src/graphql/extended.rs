//! Extended where inputs for cross-entity filtering.
//!
//! The plain `*WhereInput` structs only reach scalar columns and foreign
//! keys. The inputs here additionally accept nested relation filters and
//! the `AND` / `OR` / `NOT` combinators, and compose them into correlated
//! `IN (SELECT ...)` subqueries so the whole tree still renders to a single
//! parameterized statement.
//!
//! Grouping rules:
//! - each combinator operand renders as a parenthesized group of its own
//!   conditions joined with `AND`;
//! - `OR` joins its operand groups with `OR` inside one outer group;
//! - `NOT` negates its operand group;
//! - an operand with no conditions renders as `(1 = 1)` so combinator
//!   structure is never silently dropped.

use async_graphql::InputObject;

use super::entities::{
    AddressWhereUniqueInput, OrderOrderByInput, PaymentWhereInput, ProductWhereUniqueInput,
};
use super::filters::{DateTimeFilter, FloatFilter, IntFilter, StringFilter};
use super::orm::{DatabaseFilter, SqlValue};

/// Render a condition list as one parenthesized group.
fn render_group(conditions: &[String]) -> String {
    if conditions.is_empty() {
        "(1 = 1)".to_string()
    } else {
        format!("({})", conditions.join(" AND "))
    }
}

/// Customer filter reachable from order queries: scalar fields plus a
/// nested payment filter and boolean combinators.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "CustomerExtendedWhereInput")]
pub struct CustomerExtendedWhereInput {
    pub id: Option<StringFilter>,
    pub first_name: Option<StringFilter>,
    pub last_name: Option<StringFilter>,
    pub email: Option<StringFilter>,
    pub phone: Option<StringFilter>,
    pub address: Option<AddressWhereUniqueInput>,
    /// Matches customers that have at least one payment satisfying the filter
    pub payments: Option<PaymentWhereInput>,
    pub created_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
    #[graphql(name = "AND")]
    pub and: Option<Vec<CustomerExtendedWhereInput>>,
    #[graphql(name = "OR")]
    pub or: Option<Vec<CustomerExtendedWhereInput>>,
    #[graphql(name = "NOT")]
    pub not: Option<Box<CustomerExtendedWhereInput>>,
}

impl CustomerExtendedWhereInput {
    /// Render this filter as a single parenthesized group.
    fn group(&self) -> (String, Vec<SqlValue>) {
        let (conditions, values) = self.to_sql_conditions();
        (render_group(&conditions), values)
    }
}

impl DatabaseFilter for CustomerExtendedWhereInput {
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
        if let Some(payments) = &self.payments {
            let (sub_conditions, sub_values) = payments.to_sql_conditions();
            conditions.push(format!(
                "customers.id IN (SELECT payments.customer_id FROM payments WHERE {})",
                render_group(&sub_conditions)
            ));
            values.extend(sub_values);
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

        for group in self.and.iter().flatten() {
            let (sql, vals) = group.group();
            conditions.push(sql);
            values.extend(vals);
        }
        if let Some(or_groups) = &self.or {
            if !or_groups.is_empty() {
                let mut parts = Vec::new();
                for group in or_groups {
                    let (sql, vals) = group.group();
                    parts.push(sql);
                    values.extend(vals);
                }
                conditions.push(format!("({})", parts.join(" OR ")));
            }
        }
        if let Some(not) = &self.not {
            let (sql, vals) = not.group();
            conditions.push(format!("NOT {}", sql));
            values.extend(vals);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// Order filter with a nested customer filter and boolean combinators.
#[derive(InputObject, Default, Clone, Debug)]
#[graphql(name = "OrderExtendedWhereInput")]
pub struct OrderExtendedWhereInput {
    pub id: Option<StringFilter>,
    pub quantity: Option<IntFilter>,
    pub discount: Option<FloatFilter>,
    pub total_price: Option<IntFilter>,
    /// Matches orders whose customer satisfies the nested filter
    pub customer: Option<CustomerExtendedWhereInput>,
    pub product: Option<ProductWhereUniqueInput>,
    #[graphql(name = "AND")]
    pub and: Option<Vec<OrderExtendedWhereInput>>,
    #[graphql(name = "OR")]
    pub or: Option<Vec<OrderExtendedWhereInput>>,
    #[graphql(name = "NOT")]
    pub not: Option<Box<OrderExtendedWhereInput>>,
}

impl OrderExtendedWhereInput {
    /// Render this filter as a single parenthesized group.
    fn group(&self) -> (String, Vec<SqlValue>) {
        let (conditions, values) = self.to_sql_conditions();
        (render_group(&conditions), values)
    }
}

impl DatabaseFilter for OrderExtendedWhereInput {
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
            let (sql, vals) = customer.group();
            conditions.push(format!(
                "orders.customer_id IN (SELECT customers.id FROM customers WHERE {})",
                sql
            ));
            values.extend(vals);
        }
        if let Some(product) = &self.product {
            conditions.push("orders.product_id = ?".to_string());
            values.push(SqlValue::String(product.id.clone()));
        }

        for group in self.and.iter().flatten() {
            let (sql, vals) = group.group();
            conditions.push(sql);
            values.extend(vals);
        }
        if let Some(or_groups) = &self.or {
            if !or_groups.is_empty() {
                let mut parts = Vec::new();
                for group in or_groups {
                    let (sql, vals) = group.group();
                    parts.push(sql);
                    values.extend(vals);
                }
                conditions.push(format!("({})", parts.join(" OR ")));
            }
        }
        if let Some(not) = &self.not {
            let (sql, vals) = not.group();
            conditions.push(format!("NOT {}", sql));
            values.extend(vals);
        }

        (conditions, values)
    }

    fn is_empty(&self) -> bool {
        self.to_sql_conditions().0.is_empty()
    }
}

/// The full argument set of an extended order search: filter, sort and
/// offset pagination. Shared by the GraphQL query and the REST composer.
#[derive(Default, Clone, Debug)]
pub struct OrderExtendedFindManyArgs {
    pub where_: Option<OrderExtendedWhereInput>,
    pub order_by: Option<Vec<OrderOrderByInput>>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graphql::entities::{Order, PaymentType};
    use crate::graphql::orm::EntityQuery;

    #[test]
    fn nested_customer_payment_filter_renders_correlated_subqueries() {
        let filter = OrderExtendedWhereInput {
            customer: Some(CustomerExtendedWhereInput {
                payments: Some(PaymentWhereInput {
                    payment_type: Some(PaymentType::Cash),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "orders.customer_id IN (SELECT customers.id FROM customers WHERE \
                 (customers.id IN (SELECT payments.customer_id FROM payments WHERE \
                 (payments.payment_type = ?))))"
                    .to_string()
            ]
        );
        assert_eq!(values, vec![SqlValue::String("Cash".to_string())]);
    }

    #[test]
    fn and_groups_render_side_by_side() {
        let filter = OrderExtendedWhereInput {
            and: Some(vec![
                OrderExtendedWhereInput {
                    quantity: Some(IntFilter::gte(2)),
                    ..Default::default()
                },
                OrderExtendedWhereInput {
                    discount: Some(FloatFilter::gt(0.0)),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "(orders.quantity >= ?)".to_string(),
                "(orders.discount > ?)".to_string(),
            ]
        );
        assert_eq!(values, vec![SqlValue::Int(2), SqlValue::Float(0.0)]);
    }

    #[test]
    fn or_groups_collapse_into_one_disjunction() {
        let filter = OrderExtendedWhereInput {
            or: Some(vec![
                OrderExtendedWhereInput {
                    quantity: Some(IntFilter::equals(1)),
                    ..Default::default()
                },
                OrderExtendedWhereInput {
                    total_price: Some(IntFilter::gte(1000)),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(
            conditions,
            vec!["((orders.quantity = ?) OR (orders.total_price >= ?))".to_string()]
        );
        assert_eq!(values, vec![SqlValue::Int(1), SqlValue::Int(1000)]);
    }

    #[test]
    fn not_negates_its_group() {
        let filter = OrderExtendedWhereInput {
            not: Some(Box::new(OrderExtendedWhereInput {
                quantity: Some(IntFilter::equals(0)),
                ..Default::default()
            })),
            ..Default::default()
        };

        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(conditions, vec!["NOT (orders.quantity = ?)".to_string()]);
        assert_eq!(values, vec![SqlValue::Int(0)]);
    }

    #[test]
    fn empty_combinator_operand_keeps_its_slot() {
        let filter = OrderExtendedWhereInput {
            not: Some(Box::new(OrderExtendedWhereInput::default())),
            ..Default::default()
        };

        let (conditions, values) = filter.to_sql_conditions();
        assert_eq!(conditions, vec!["NOT (1 = 1)".to_string()]);
        assert_eq!(values, vec![]);
    }

    #[test]
    fn builder_renumbers_placeholders_inside_subqueries() {
        let filter = OrderExtendedWhereInput {
            quantity: Some(IntFilter::gte(2)),
            customer: Some(CustomerExtendedWhereInput {
                payments: Some(PaymentWhereInput {
                    payment_type: Some(PaymentType::Card),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let query = EntityQuery::<Order>::new().filter(&filter);
        let sql = query.to_sql();
        assert!(sql.contains("orders.quantity >= ?1"), "sql was: {sql}");
        assert!(sql.contains("payments.payment_type = ?2"), "sql was: {sql}");
        assert_eq!(
            query.bind_values(),
            &[SqlValue::Int(2), SqlValue::String("Card".to_string())]
        );
    }
}
