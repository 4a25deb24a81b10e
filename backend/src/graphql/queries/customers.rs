//! Customer queries

use crate::graphql::entities::{
    Customer, CustomerOrderByInput, CustomerWhereInput, CustomerWhereUniqueInput,
};

use super::prelude::*;

#[derive(Default)]
pub struct CustomerQueries;

#[Object]
impl CustomerQueries {
    /// List customers matching an optional filter
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

        let mut query = EntityQuery::<Customer>::new();
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

    /// Fetch a single customer
    async fn customer(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: CustomerWhereUniqueInput,
    ) -> Result<Option<Customer>> {
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Customer>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?)
    }

    /// Count customers matching an optional filter
    #[graphql(name = "_customersMeta")]
    async fn customers_meta(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<CustomerWhereInput>,
    ) -> Result<MetaQueryPayload> {
        let db = ctx.data_unchecked::<Database>();
        let mut query = EntityQuery::<Customer>::new();
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        let count = query.count(db.pool()).await?;
        Ok(MetaQueryPayload { count })
    }
}
