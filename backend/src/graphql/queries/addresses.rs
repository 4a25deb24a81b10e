//! Address queries

use crate::graphql::entities::{
    Address, AddressOrderByInput, AddressWhereInput, AddressWhereUniqueInput,
};

use super::prelude::*;

#[derive(Default)]
pub struct AddressQueries;

#[Object]
impl AddressQueries {
    /// List addresses matching an optional filter
    async fn addresses(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<AddressWhereInput>,
        order_by: Option<Vec<AddressOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Address>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;

        let mut query = EntityQuery::<Address>::new();
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

    /// Fetch a single address
    async fn address(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: AddressWhereUniqueInput,
    ) -> Result<Option<Address>> {
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Address>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?)
    }

    /// Count addresses matching an optional filter
    #[graphql(name = "_addressesMeta")]
    async fn addresses_meta(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<AddressWhereInput>,
    ) -> Result<MetaQueryPayload> {
        let db = ctx.data_unchecked::<Database>();
        let mut query = EntityQuery::<Address>::new();
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        let count = query.count(db.pool()).await?;
        Ok(MetaQueryPayload { count })
    }
}
