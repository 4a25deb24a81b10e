//! REST endpoint for the extended order search.
//!
//! `GET /api/orders/customer/payment-method` takes the search arguments
//! as a bracket-notation query string, runs the same composition the
//! GraphQL `ordersWherePaymentMethod` query uses, and responds with a
//! fixed projection: each order plus its customer's id and payment
//! methods and the product id.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::AppState;
use crate::db::Database;
use crate::graphql::entities::{Customer, Payment, PaymentType};
use crate::graphql::extended::OrderExtendedFindManyArgs;
use crate::graphql::orm::{EntityQuery, SqlValue};
use crate::graphql::queries::orders::find_orders_extended;

use super::compose::compose_order_args;

/// One row of the search response.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearchRow {
    pub created_at: String,
    pub customer: Option<CustomerProjection>,
    pub discount: Option<f64>,
    pub id: String,
    pub product: Option<ProductRef>,
    pub quantity: Option<i64>,
    pub total_price: Option<i64>,
    pub updated_at: String,
}

/// The customer slice of the projection: id and payment methods only.
#[derive(Serialize, Debug)]
pub struct CustomerProjection {
    pub id: String,
    pub payments: Vec<PaymentMethodRef>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRef {
    pub payment_type: Option<PaymentType>,
}

#[derive(Serialize, Debug)]
pub struct ProductRef {
    pub id: String,
}

async fn search_by_payment_method(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let args = match compose_order_args(query.as_deref().unwrap_or("")) {
        Ok(args) => args,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    match run_search(&state.db, args).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "order search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

/// Execute the search and resolve the fixed projection.
async fn run_search(
    db: &Database,
    args: OrderExtendedFindManyArgs,
) -> Result<Vec<OrderSearchRow>, sqlx::Error> {
    let orders = find_orders_extended(db.pool(), args).await?;

    let mut rows = Vec::with_capacity(orders.len());
    for order in orders {
        let customer = match &order.customer_id {
            Some(customer_id) => project_customer(db, customer_id).await?,
            None => None,
        };
        rows.push(OrderSearchRow {
            created_at: order.created_at,
            customer,
            discount: order.discount,
            id: order.id,
            product: order.product_id.map(|id| ProductRef { id }),
            quantity: order.quantity,
            total_price: order.total_price,
            updated_at: order.updated_at,
        });
    }
    Ok(rows)
}

async fn project_customer(
    db: &Database,
    customer_id: &str,
) -> Result<Option<CustomerProjection>, sqlx::Error> {
    let Some(customer) = EntityQuery::<Customer>::new()
        .where_clause(
            "customers.id = ?",
            SqlValue::String(customer_id.to_string()),
        )
        .fetch_optional(db.pool())
        .await?
    else {
        return Ok(None);
    };

    let payments = EntityQuery::<Payment>::new()
        .where_clause(
            "payments.customer_id = ?",
            SqlValue::String(customer.id.clone()),
        )
        .default_order()
        .fetch_all(db.pool())
        .await?;

    Ok(Some(CustomerProjection {
        id: customer.id,
        payments: payments
            .into_iter()
            .map(|p| PaymentMethodRef {
                payment_type: p.payment_type,
            })
            .collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/orders/customer/payment-method", get(search_by_payment_method))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graphql::orm::execute_with_binds;

    async fn seed(db: &Database) {
        let t = |n: u32| format!("2026-01-0{n}T00:00:00+00:00");

        for (id, email) in [("cust-1", "ada@example.com"), ("cust-2", "bob@example.com")] {
            execute_with_binds(
                "INSERT INTO customers (id, email, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    SqlValue::String(id.to_string()),
                    SqlValue::String(email.to_string()),
                    SqlValue::String(t(1)),
                    SqlValue::String(t(1)),
                ],
                db.pool(),
            )
            .await
            .unwrap();
        }

        for (customer_id, payment_type) in [("cust-1", "Cash"), ("cust-2", "Card")] {
            execute_with_binds(
                "INSERT INTO payments (payment_type, customer_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    SqlValue::String(payment_type.to_string()),
                    SqlValue::String(customer_id.to_string()),
                    SqlValue::String(t(1)),
                    SqlValue::String(t(1)),
                ],
                db.pool(),
            )
            .await
            .unwrap();
        }

        execute_with_binds(
            "INSERT INTO products (id, name, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4)",
            &[
                SqlValue::String("prod-1".to_string()),
                SqlValue::String("Widget".to_string()),
                SqlValue::String(t(1)),
                SqlValue::String(t(1)),
            ],
            db.pool(),
        )
        .await
        .unwrap();

        for (id, customer_id, quantity, day) in [
            ("order-1", "cust-1", 2i64, 2u32),
            ("order-2", "cust-1", 1, 3),
            ("order-3", "cust-2", 5, 4),
        ] {
            execute_with_binds(
                "INSERT INTO orders \
                 (id, quantity, customer_id, product_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    SqlValue::String(id.to_string()),
                    SqlValue::Int(quantity),
                    SqlValue::String(customer_id.to_string()),
                    SqlValue::String("prod-1".to_string()),
                    SqlValue::String(t(day)),
                    SqlValue::String(t(day)),
                ],
                db.pool(),
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn search_filters_through_customer_payments() {
        let db = Database::connect_memory().await.unwrap();
        seed(&db).await;

        let args =
            compose_order_args("where[customer][payments][paymentType]=Cash&orderBy[createdAt]=asc")
                .unwrap();
        let rows = run_search(&db, args).await.unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["order-1", "order-2"]);

        let customer = rows[0].customer.as_ref().unwrap();
        assert_eq!(customer.id, "cust-1");
        assert_eq!(customer.payments.len(), 1);
        assert_eq!(customer.payments[0].payment_type, Some(PaymentType::Cash));
        assert_eq!(rows[0].product.as_ref().unwrap().id, "prod-1");
    }

    #[tokio::test]
    async fn search_applies_combinators_and_pagination() {
        let db = Database::connect_memory().await.unwrap();
        seed(&db).await;

        let args = compose_order_args(
            "where[OR][0][quantity][gte]=5&where[OR][1][customer][payments][paymentType]=Cash\
             &orderBy[createdAt]=desc&skip=1&take=2",
        )
        .unwrap();
        let rows = run_search(&db, args).await.unwrap();

        // All three orders match; newest first, then skip one
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["order-2", "order-1"]);
    }

    #[tokio::test]
    async fn search_with_no_arguments_returns_everything() {
        let db = Database::connect_memory().await.unwrap();
        seed(&db).await;

        let args = compose_order_args("").unwrap();
        let rows = run_search(&db, args).await.unwrap();
        assert_eq!(rows.len(), 3);
    }
}
