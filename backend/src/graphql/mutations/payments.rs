//! Payment mutations
//!
//! Payments use an INTEGER PRIMARY KEY, so the id comes from the insert
//! rather than a generated UUID.

use async_graphql::{Context, Object, Result};
use chrono::Utc;
use storefront_macros::mutation_result;

use crate::db::Database;
use crate::graphql::entities::{
    Payment, PaymentCreateInput, PaymentUpdateInput, PaymentWhereUniqueInput,
};
use crate::graphql::orm::{EntityQuery, SqlValue, execute_with_binds};

mutation_result!(PaymentResult, payment: Payment);

#[derive(Default)]
pub struct PaymentMutations;

#[Object]
impl PaymentMutations {
    /// Create a payment
    async fn create_payment(
        &self,
        ctx: &Context<'_>,
        data: PaymentCreateInput,
    ) -> Result<PaymentResult> {
        let db = ctx.data_unchecked::<Database>();
        let now = Utc::now().to_rfc3339();
        let payment_type = data.payment_type;
        let customer_id = data.customer.map(|c| c.id);

        let sql = "INSERT INTO payments (payment_type, customer_id, created_at, updated_at) \
                   VALUES (?1, ?2, ?3, ?4)";
        let values = [
            payment_type
                .map(|pt| pt.as_str().to_string())
                .into(),
            customer_id.clone().into(),
            SqlValue::String(now.clone()),
            SqlValue::String(now.clone()),
        ];
        let result = execute_with_binds(sql, &values, db.pool()).await?;

        let payment = Payment {
            id: result.last_insert_rowid(),
            payment_type,
            customer_id,
            created_at: now.clone(),
            updated_at: now,
        };
        Ok(PaymentResult::success(payment))
    }

    /// Update a payment. Absent input fields are left unchanged.
    async fn update_payment(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: PaymentWhereUniqueInput,
        data: PaymentUpdateInput,
    ) -> Result<PaymentResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(mut payment) = EntityQuery::<Payment>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(PaymentResult::error(format!(
                "payment {} not found",
                where_.id
            )));
        };

        if let Some(payment_type) = data.payment_type {
            payment.payment_type = Some(payment_type);
        }
        if let Some(customer) = data.customer {
            payment.customer_id = Some(customer.id);
        }
        payment.updated_at = Utc::now().to_rfc3339();

        let sql = "UPDATE payments SET \
                   payment_type = ?1, customer_id = ?2, updated_at = ?3 \
                   WHERE id = ?4";
        let values = [
            payment
                .payment_type
                .map(|pt| pt.as_str().to_string())
                .into(),
            payment.customer_id.clone().into(),
            SqlValue::String(payment.updated_at.clone()),
            SqlValue::Int(payment.id),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(PaymentResult::success(payment))
    }

    /// Delete a payment, returning the deleted record
    async fn delete_payment(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: PaymentWhereUniqueInput,
    ) -> Result<PaymentResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(payment) = EntityQuery::<Payment>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(PaymentResult::error(format!(
                "payment {} not found",
                where_.id
            )));
        };

        let values = [SqlValue::Int(payment.id)];
        execute_with_binds("DELETE FROM payments WHERE id = ?1", &values, db.pool()).await?;

        Ok(PaymentResult::success(payment))
    }
}
