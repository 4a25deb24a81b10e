//! Composition of REST search arguments.
//!
//! Takes the JSON tree produced by [`nested_query`](super::nested_query)
//! and builds the same `OrderExtendedFindManyArgs` the GraphQL resolver
//! receives, coercing the string leaves into the right scalar types.
//! Errors carry the dotted path of the offending field so a client can
//! see exactly which part of the query string was wrong.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::graphql::entities::{
    AddressWhereUniqueInput, CustomerWhereUniqueInput, OrderOrderByInput, PaymentType,
    PaymentWhereInput, ProductWhereUniqueInput,
};
use crate::graphql::extended::{
    CustomerExtendedWhereInput, OrderExtendedFindManyArgs, OrderExtendedWhereInput,
};
use crate::graphql::filters::{DateTimeFilter, FloatFilter, IntFilter, StringFilter};
use crate::graphql::orm::OrderDirection;

use super::nested_query::{ParseError, parse_query};

#[derive(Debug, Error, PartialEq)]
pub enum ComposeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unknown field: {path}")]
    UnknownField { path: String },
    #[error("invalid value at {path}: expected {expected}")]
    InvalidValue {
        path: String,
        expected: &'static str,
    },
}

impl ComposeError {
    fn unknown(path: &str, field: &str) -> Self {
        ComposeError::UnknownField {
            path: format!("{path}.{field}"),
        }
    }

    fn invalid(path: &str, expected: &'static str) -> Self {
        ComposeError::InvalidValue {
            path: path.to_string(),
            expected,
        }
    }
}

/// Parse and compose a raw query string into extended search arguments.
pub fn compose_order_args(raw_query: &str) -> Result<OrderExtendedFindManyArgs, ComposeError> {
    let tree = parse_query(raw_query)?;
    let map = expect_object(&tree, "query")?;

    let mut args = OrderExtendedFindManyArgs::default();
    for (field, value) in map {
        match field.as_str() {
            "where" => args.where_ = Some(order_where(value, "where")?),
            "orderBy" => args.order_by = Some(order_by_list(value, "orderBy")?),
            "skip" => args.skip = Some(page_value(value, "skip")?),
            "take" => args.take = Some(page_value(value, "take")?),
            _ => return Err(ComposeError::unknown("query", field)),
        }
    }
    Ok(args)
}

fn order_where(value: &Value, path: &str) -> Result<OrderExtendedWhereInput, ComposeError> {
    let map = expect_object(value, path)?;
    let mut input = OrderExtendedWhereInput::default();

    for (field, value) in map {
        let field_path = format!("{path}.{field}");
        match field.as_str() {
            "id" => input.id = Some(string_filter(value, &field_path)?),
            "quantity" => input.quantity = Some(int_filter(value, &field_path)?),
            "discount" => input.discount = Some(float_filter(value, &field_path)?),
            "totalPrice" => input.total_price = Some(int_filter(value, &field_path)?),
            "customer" => input.customer = Some(customer_where(value, &field_path)?),
            "product" => {
                input.product = Some(ProductWhereUniqueInput {
                    id: unique_id(value, &field_path)?,
                })
            }
            "AND" => input.and = Some(group_list(value, &field_path, order_where)?),
            "OR" => input.or = Some(group_list(value, &field_path, order_where)?),
            "NOT" => input.not = Some(Box::new(order_where(value, &field_path)?)),
            _ => return Err(ComposeError::unknown(path, field)),
        }
    }
    Ok(input)
}

fn customer_where(value: &Value, path: &str) -> Result<CustomerExtendedWhereInput, ComposeError> {
    let map = expect_object(value, path)?;
    let mut input = CustomerExtendedWhereInput::default();

    for (field, value) in map {
        let field_path = format!("{path}.{field}");
        match field.as_str() {
            "id" => input.id = Some(string_filter(value, &field_path)?),
            "firstName" => input.first_name = Some(string_filter(value, &field_path)?),
            "lastName" => input.last_name = Some(string_filter(value, &field_path)?),
            "email" => input.email = Some(string_filter(value, &field_path)?),
            "phone" => input.phone = Some(string_filter(value, &field_path)?),
            "address" => {
                input.address = Some(AddressWhereUniqueInput {
                    id: unique_id(value, &field_path)?,
                })
            }
            "payments" => input.payments = Some(payment_where(value, &field_path)?),
            "createdAt" => input.created_at = Some(datetime_filter(value, &field_path)?),
            "updatedAt" => input.updated_at = Some(datetime_filter(value, &field_path)?),
            "AND" => input.and = Some(group_list(value, &field_path, customer_where)?),
            "OR" => input.or = Some(group_list(value, &field_path, customer_where)?),
            "NOT" => input.not = Some(Box::new(customer_where(value, &field_path)?)),
            _ => return Err(ComposeError::unknown(path, field)),
        }
    }
    Ok(input)
}

fn payment_where(value: &Value, path: &str) -> Result<PaymentWhereInput, ComposeError> {
    let map = expect_object(value, path)?;
    let mut input = PaymentWhereInput::default();

    for (field, value) in map {
        let field_path = format!("{path}.{field}");
        match field.as_str() {
            "id" => input.id = Some(int_filter(value, &field_path)?),
            "paymentType" => input.payment_type = Some(payment_type(value, &field_path)?),
            "customer" => {
                input.customer = Some(CustomerWhereUniqueInput {
                    id: unique_id(value, &field_path)?,
                })
            }
            "createdAt" => input.created_at = Some(datetime_filter(value, &field_path)?),
            "updatedAt" => input.updated_at = Some(datetime_filter(value, &field_path)?),
            _ => return Err(ComposeError::unknown(path, field)),
        }
    }
    Ok(input)
}

/// `AND` / `OR` accept either an indexed list of groups or a single group.
fn group_list<T>(
    value: &Value,
    path: &str,
    compose: fn(&Value, &str) -> Result<T, ComposeError>,
) -> Result<Vec<T>, ComposeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| compose(item, &format!("{path}.{i}")))
            .collect(),
        Value::Object(_) => Ok(vec![compose(value, path)?]),
        _ => Err(ComposeError::invalid(path, "an object or a list of objects")),
    }
}

/// A relation reference: either `field[id]=...` or a bare `field=...`.
fn unique_id(value: &Value, path: &str) -> Result<String, ComposeError> {
    match value {
        Value::String(id) => Ok(id.clone()),
        Value::Object(map) => {
            let mut id = None;
            for (field, value) in map {
                if field != "id" {
                    return Err(ComposeError::unknown(path, field));
                }
                id = Some(expect_string(value, &format!("{path}.id"))?);
            }
            id.ok_or_else(|| ComposeError::invalid(path, "an id"))
        }
        _ => Err(ComposeError::invalid(path, "an id")),
    }
}

fn payment_type(value: &Value, path: &str) -> Result<PaymentType, ComposeError> {
    // Bare scalar means equality; {equals: ...} is accepted as an alias
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let mut equals = None;
            for (field, value) in map {
                if field != "equals" {
                    return Err(ComposeError::unknown(path, field));
                }
                equals = Some(expect_string(value, &format!("{path}.equals"))?);
            }
            equals.ok_or_else(|| ComposeError::invalid(path, "Card, Cash or Paypal"))?
        }
        _ => return Err(ComposeError::invalid(path, "Card, Cash or Paypal")),
    };
    PaymentType::parse(&raw).ok_or_else(|| ComposeError::invalid(path, "Card, Cash or Paypal"))
}

fn string_filter(value: &Value, path: &str) -> Result<StringFilter, ComposeError> {
    // A bare scalar is shorthand for equals
    if let Value::String(s) = value {
        return Ok(StringFilter::equals(s.clone()));
    }

    let map = expect_object(value, path)?;
    let mut filter = StringFilter::default();
    for (op, value) in map {
        let op_path = format!("{path}.{op}");
        match op.as_str() {
            "equals" => filter.equals = Some(expect_string(value, &op_path)?),
            "not" => filter.not = Some(expect_string(value, &op_path)?),
            "contains" => filter.contains = Some(expect_string(value, &op_path)?),
            "startsWith" => filter.starts_with = Some(expect_string(value, &op_path)?),
            "endsWith" => filter.ends_with = Some(expect_string(value, &op_path)?),
            "in" => filter.in_list = Some(string_list(value, &op_path)?),
            "notIn" => filter.not_in = Some(string_list(value, &op_path)?),
            _ => return Err(ComposeError::unknown(path, op)),
        }
    }
    Ok(filter)
}

fn int_filter(value: &Value, path: &str) -> Result<IntFilter, ComposeError> {
    if !value.is_object() {
        return Ok(IntFilter::equals(expect_i64(value, path)?));
    }

    let map = expect_object(value, path)?;
    let mut filter = IntFilter::default();
    for (op, value) in map {
        let op_path = format!("{path}.{op}");
        match op.as_str() {
            "equals" => filter.equals = Some(expect_i64(value, &op_path)?),
            "not" => filter.not = Some(expect_i64(value, &op_path)?),
            "lt" => filter.lt = Some(expect_i64(value, &op_path)?),
            "lte" => filter.lte = Some(expect_i64(value, &op_path)?),
            "gt" => filter.gt = Some(expect_i64(value, &op_path)?),
            "gte" => filter.gte = Some(expect_i64(value, &op_path)?),
            "in" => filter.in_list = Some(int_list(value, &op_path)?),
            "notIn" => filter.not_in = Some(int_list(value, &op_path)?),
            _ => return Err(ComposeError::unknown(path, op)),
        }
    }
    Ok(filter)
}

fn float_filter(value: &Value, path: &str) -> Result<FloatFilter, ComposeError> {
    if !value.is_object() {
        return Ok(FloatFilter {
            equals: Some(expect_f64(value, path)?),
            ..Default::default()
        });
    }

    let map = expect_object(value, path)?;
    let mut filter = FloatFilter::default();
    for (op, value) in map {
        let op_path = format!("{path}.{op}");
        match op.as_str() {
            "equals" => filter.equals = Some(expect_f64(value, &op_path)?),
            "not" => filter.not = Some(expect_f64(value, &op_path)?),
            "lt" => filter.lt = Some(expect_f64(value, &op_path)?),
            "lte" => filter.lte = Some(expect_f64(value, &op_path)?),
            "gt" => filter.gt = Some(expect_f64(value, &op_path)?),
            "gte" => filter.gte = Some(expect_f64(value, &op_path)?),
            _ => return Err(ComposeError::unknown(path, op)),
        }
    }
    Ok(filter)
}

fn datetime_filter(value: &Value, path: &str) -> Result<DateTimeFilter, ComposeError> {
    if let Value::String(s) = value {
        return Ok(DateTimeFilter {
            equals: Some(s.clone()),
            ..Default::default()
        });
    }

    let map = expect_object(value, path)?;
    let mut filter = DateTimeFilter::default();
    for (op, value) in map {
        let op_path = format!("{path}.{op}");
        match op.as_str() {
            "equals" => filter.equals = Some(expect_string(value, &op_path)?),
            "not" => filter.not = Some(expect_string(value, &op_path)?),
            "lt" => filter.lt = Some(expect_string(value, &op_path)?),
            "lte" => filter.lte = Some(expect_string(value, &op_path)?),
            "gt" => filter.gt = Some(expect_string(value, &op_path)?),
            "gte" => filter.gte = Some(expect_string(value, &op_path)?),
            _ => return Err(ComposeError::unknown(path, op)),
        }
    }
    Ok(filter)
}

fn order_by_list(value: &Value, path: &str) -> Result<Vec<OrderOrderByInput>, ComposeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| order_by(item, &format!("{path}.{i}")))
            .collect(),
        Value::Object(_) => Ok(vec![order_by(value, path)?]),
        _ => Err(ComposeError::invalid(path, "an object or a list of objects")),
    }
}

fn order_by(value: &Value, path: &str) -> Result<OrderOrderByInput, ComposeError> {
    let map = expect_object(value, path)?;
    let mut input = OrderOrderByInput::default();

    for (field, value) in map {
        let field_path = format!("{path}.{field}");
        let direction = Some(sort_direction(value, &field_path)?);
        match field.as_str() {
            "id" => input.id = direction,
            "quantity" => input.quantity = direction,
            "discount" => input.discount = direction,
            "totalPrice" => input.total_price = direction,
            "customerId" => input.customer_id = direction,
            "productId" => input.product_id = direction,
            "createdAt" => input.created_at = direction,
            "updatedAt" => input.updated_at = direction,
            _ => return Err(ComposeError::unknown(path, field)),
        }
    }
    Ok(input)
}

fn sort_direction(value: &Value, path: &str) -> Result<OrderDirection, ComposeError> {
    let raw = expect_string(value, path)?;
    match raw.to_ascii_lowercase().as_str() {
        "asc" => Ok(OrderDirection::Asc),
        "desc" => Ok(OrderDirection::Desc),
        _ => Err(ComposeError::invalid(path, "asc or desc")),
    }
}

fn page_value(value: &Value, path: &str) -> Result<i64, ComposeError> {
    let n = expect_i64(value, path)?;
    if n < 0 {
        return Err(ComposeError::invalid(path, "a non-negative integer"));
    }
    Ok(n)
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ComposeError> {
    value
        .as_object()
        .ok_or_else(|| ComposeError::invalid(path, "an object"))
}

fn expect_string(value: &Value, path: &str) -> Result<String, ComposeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ComposeError::invalid(path, "a string"))
}

fn expect_i64(value: &Value, path: &str) -> Result<i64, ComposeError> {
    match value {
        Value::String(s) => s.parse(),
        Value::Number(n) => return n.as_i64().ok_or_else(|| ComposeError::invalid(path, "an integer")),
        _ => return Err(ComposeError::invalid(path, "an integer")),
    }
    .map_err(|_| ComposeError::invalid(path, "an integer"))
}

fn expect_f64(value: &Value, path: &str) -> Result<f64, ComposeError> {
    match value {
        Value::String(s) => s.parse(),
        Value::Number(n) => return n.as_f64().ok_or_else(|| ComposeError::invalid(path, "a number")),
        _ => return Err(ComposeError::invalid(path, "a number")),
    }
    .map_err(|_| ComposeError::invalid(path, "a number"))
}

fn string_list(value: &Value, path: &str) -> Result<Vec<String>, ComposeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| expect_string(item, &format!("{path}.{i}")))
            .collect(),
        // A single scalar is a one-element list
        Value::String(_) => Ok(vec![expect_string(value, path)?]),
        _ => Err(ComposeError::invalid(path, "a list of strings")),
    }
}

fn int_list(value: &Value, path: &str) -> Result<Vec<i64>, ComposeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| expect_i64(item, &format!("{path}.{i}")))
            .collect(),
        Value::String(_) | Value::Number(_) => Ok(vec![expect_i64(value, path)?]),
        _ => Err(ComposeError::invalid(path, "a list of integers")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graphql::orm::DatabaseFilter;

    #[test]
    fn composes_nested_payment_type_search() {
        let args =
            compose_order_args("where[customer][payments][paymentType]=Cash&skip=0&take=10")
                .unwrap();

        assert_eq!(args.skip, Some(0));
        assert_eq!(args.take, Some(10));
        let where_ = args.where_.unwrap();
        let customer = where_.customer.unwrap();
        assert_eq!(
            customer.payments.unwrap().payment_type,
            Some(PaymentType::Cash)
        );
    }

    #[test]
    fn composes_combinators_and_scalar_operators() {
        let args = compose_order_args(
            "where[OR][0][quantity][gte]=2&where[OR][1][totalPrice][lt]=500\
             &where[NOT][discount][equals]=0",
        )
        .unwrap();

        let where_ = args.where_.unwrap();
        let or = where_.or.unwrap();
        assert_eq!(or.len(), 2);
        assert_eq!(or[0].quantity.as_ref().unwrap().gte, Some(2));
        assert_eq!(or[1].total_price.as_ref().unwrap().lt, Some(500));
        assert_eq!(where_.not.unwrap().discount.unwrap().equals, Some(0.0));
    }

    #[test]
    fn single_object_combinator_becomes_one_group() {
        let args = compose_order_args("where[AND][quantity][gte]=1").unwrap();
        let and = args.where_.unwrap().and.unwrap();
        assert_eq!(and.len(), 1);
        assert_eq!(and[0].quantity.as_ref().unwrap().gte, Some(1));
    }

    #[test]
    fn composed_args_match_the_graphql_input_shape() {
        let args = compose_order_args("where[customer][payments][paymentType]=Card").unwrap();
        let (conditions, _) = args.where_.unwrap().to_sql_conditions();
        assert_eq!(
            conditions,
            vec![
                "orders.customer_id IN (SELECT customers.id FROM customers WHERE \
                 (customers.id IN (SELECT payments.customer_id FROM payments WHERE \
                 (payments.payment_type = ?))))"
                    .to_string()
            ]
        );
    }

    #[test]
    fn order_by_accepts_case_insensitive_directions() {
        let args = compose_order_args("orderBy[createdAt]=DESC&orderBy[id]=asc").unwrap();
        let order_by = args.order_by.unwrap();
        assert_eq!(order_by.len(), 1);
        assert_eq!(order_by[0].created_at, Some(OrderDirection::Desc));
        assert_eq!(order_by[0].id, Some(OrderDirection::Asc));
    }

    #[test]
    fn unknown_fields_report_their_dotted_path() {
        let err = compose_order_args("where[customer][payments][bogusField]=1").unwrap_err();
        assert_eq!(
            err,
            ComposeError::UnknownField {
                path: "where.customer.payments.bogusField".to_string()
            }
        );
    }

    #[test]
    fn wrong_scalar_types_report_their_dotted_path() {
        let err = compose_order_args("where[quantity][gte]=abc").unwrap_err();
        assert_eq!(
            err,
            ComposeError::InvalidValue {
                path: "where.quantity.gte".to_string(),
                expected: "an integer",
            }
        );
    }

    #[test]
    fn negative_pagination_is_rejected() {
        let err = compose_order_args("skip=-1").unwrap_err();
        assert_eq!(
            err,
            ComposeError::InvalidValue {
                path: "skip".to_string(),
                expected: "a non-negative integer",
            }
        );
    }

    #[test]
    fn unknown_top_level_fields_are_rejected() {
        let err = compose_order_args("limit=5").unwrap_err();
        assert_eq!(
            err,
            ComposeError::UnknownField {
                path: "query.limit".to_string()
            }
        );
    }
}
