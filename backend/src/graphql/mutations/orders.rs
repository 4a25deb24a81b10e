//! Order mutations

use async_graphql::{Context, Object, Result};
use chrono::Utc;
use storefront_macros::mutation_result;
use uuid::Uuid;

use crate::db::Database;
use crate::graphql::entities::{Order, OrderCreateInput, OrderUpdateInput, OrderWhereUniqueInput};
use crate::graphql::orm::{EntityQuery, SqlValue, execute_with_binds};

mutation_result!(OrderResult, order: Order);

#[derive(Default)]
pub struct OrderMutations;

#[Object]
impl OrderMutations {
    /// Create an order
    async fn create_order(&self, ctx: &Context<'_>, data: OrderCreateInput) -> Result<OrderResult> {
        let db = ctx.data_unchecked::<Database>();
        let now = Utc::now().to_rfc3339();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            quantity: data.quantity,
            discount: data.discount,
            total_price: data.total_price,
            customer_id: data.customer.map(|c| c.id),
            product_id: data.product.map(|p| p.id),
            created_at: now.clone(),
            updated_at: now,
        };

        let sql = "INSERT INTO orders \
                   (id, quantity, discount, total_price, customer_id, product_id, created_at, updated_at) \
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
        let values = [
            SqlValue::String(order.id.clone()),
            order.quantity.into(),
            order.discount.into(),
            order.total_price.into(),
            order.customer_id.clone().into(),
            order.product_id.clone().into(),
            SqlValue::String(order.created_at.clone()),
            SqlValue::String(order.updated_at.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(OrderResult::success(order))
    }

    /// Update an order. Absent input fields are left unchanged.
    async fn update_order(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: OrderWhereUniqueInput,
        data: OrderUpdateInput,
    ) -> Result<OrderResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(mut order) = EntityQuery::<Order>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(OrderResult::error(format!("order {} not found", where_.id)));
        };

        if let Some(quantity) = data.quantity {
            order.quantity = Some(quantity);
        }
        if let Some(discount) = data.discount {
            order.discount = Some(discount);
        }
        if let Some(total_price) = data.total_price {
            order.total_price = Some(total_price);
        }
        if let Some(customer) = data.customer {
            order.customer_id = Some(customer.id);
        }
        if let Some(product) = data.product {
            order.product_id = Some(product.id);
        }
        order.updated_at = Utc::now().to_rfc3339();

        let sql = "UPDATE orders SET \
                   quantity = ?1, discount = ?2, total_price = ?3, customer_id = ?4, \
                   product_id = ?5, updated_at = ?6 \
                   WHERE id = ?7";
        let values = [
            order.quantity.into(),
            order.discount.into(),
            order.total_price.into(),
            order.customer_id.clone().into(),
            order.product_id.clone().into(),
            SqlValue::String(order.updated_at.clone()),
            SqlValue::String(order.id.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(OrderResult::success(order))
    }

    /// Delete an order, returning the deleted record
    async fn delete_order(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: OrderWhereUniqueInput,
    ) -> Result<OrderResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(order) = EntityQuery::<Order>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(OrderResult::error(format!("order {} not found", where_.id)));
        };

        let values = [SqlValue::String(order.id.clone())];
        execute_with_binds("DELETE FROM orders WHERE id = ?1", &values, db.pool()).await?;

        Ok(OrderResult::success(order))
    }
}
