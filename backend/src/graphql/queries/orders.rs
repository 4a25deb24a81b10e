//! Order queries, including the extended search across customer and
//! payment relations.

use sqlx::SqlitePool;

use crate::graphql::entities::{
    Order, OrderOrderByInput, OrderWhereInput, OrderWhereUniqueInput,
};
use crate::graphql::extended::{OrderExtendedFindManyArgs, OrderExtendedWhereInput};

use super::prelude::*;

/// Run an extended order search against the pool.
///
/// Shared by the GraphQL resolver below and the REST search endpoint.
pub async fn find_orders_extended(
    pool: &SqlitePool,
    args: OrderExtendedFindManyArgs,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut query = EntityQuery::<Order>::new();
    if let Some(w) = &args.where_ {
        query = query.filter(w);
    }
    for order in args.order_by.iter().flatten() {
        query = query.order_by(order);
    }
    query = query.default_order();
    if let Some(skip) = args.skip {
        query = query.offset(skip);
    }
    if let Some(take) = args.take {
        query = query.limit(take);
    }
    query.fetch_all(pool).await
}

#[derive(Default)]
pub struct OrderQueries;

#[Object]
impl OrderQueries {
    /// List orders matching an optional filter
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

        let mut query = EntityQuery::<Order>::new();
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

    /// Fetch a single order
    async fn order(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: OrderWhereUniqueInput,
    ) -> Result<Option<Order>> {
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Order>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?)
    }

    /// Count orders matching an optional filter
    #[graphql(name = "_ordersMeta")]
    async fn orders_meta(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<OrderWhereInput>,
    ) -> Result<MetaQueryPayload> {
        let db = ctx.data_unchecked::<Database>();
        let mut query = EntityQuery::<Order>::new();
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        let count = query.count(db.pool()).await?;
        Ok(MetaQueryPayload { count })
    }

    /// List orders filtered through the nested customer and payment
    /// relations, with `AND` / `OR` / `NOT` combinators
    #[graphql(name = "ordersWherePaymentMethod")]
    async fn orders_where_payment_method(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<OrderExtendedWhereInput>,
        order_by: Option<Vec<OrderOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Order>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;
        let args = OrderExtendedFindManyArgs {
            where_,
            order_by,
            skip,
            take,
        };
        Ok(find_orders_extended(db.pool(), args).await?)
    }
}
