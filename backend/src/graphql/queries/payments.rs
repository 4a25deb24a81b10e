//! Payment queries

use crate::graphql::entities::{
    Payment, PaymentOrderByInput, PaymentWhereInput, PaymentWhereUniqueInput,
};

use super::prelude::*;

#[derive(Default)]
pub struct PaymentQueries;

#[Object]
impl PaymentQueries {
    /// List payments matching an optional filter
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

        let mut query = EntityQuery::<Payment>::new();
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

    /// Fetch a single payment
    async fn payment(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: PaymentWhereUniqueInput,
    ) -> Result<Option<Payment>> {
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Payment>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?)
    }

    /// Count payments matching an optional filter
    #[graphql(name = "_paymentsMeta")]
    async fn payments_meta(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<PaymentWhereInput>,
    ) -> Result<MetaQueryPayload> {
        let db = ctx.data_unchecked::<Database>();
        let mut query = EntityQuery::<Payment>::new();
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        let count = query.count(db.pool()).await?;
        Ok(MetaQueryPayload { count })
    }
}
