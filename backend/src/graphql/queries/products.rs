//! Product queries

use crate::graphql::entities::{
    Product, ProductOrderByInput, ProductWhereInput, ProductWhereUniqueInput,
};

use super::prelude::*;

#[derive(Default)]
pub struct ProductQueries;

#[Object]
impl ProductQueries {
    /// List products matching an optional filter
    async fn products(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<ProductWhereInput>,
        order_by: Option<Vec<ProductOrderByInput>>,
        skip: Option<i64>,
        take: Option<i64>,
    ) -> Result<Vec<Product>> {
        let db = ctx.data_unchecked::<Database>();
        let (skip, take) = page_args(skip, take)?;

        let mut query = EntityQuery::<Product>::new();
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

    /// Fetch a single product
    async fn product(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: ProductWhereUniqueInput,
    ) -> Result<Option<Product>> {
        let db = ctx.data_unchecked::<Database>();
        Ok(EntityQuery::<Product>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?)
    }

    /// Count products matching an optional filter
    #[graphql(name = "_productsMeta")]
    async fn products_meta(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: Option<ProductWhereInput>,
    ) -> Result<MetaQueryPayload> {
        let db = ctx.data_unchecked::<Database>();
        let mut query = EntityQuery::<Product>::new();
        if let Some(w) = &where_ {
            query = query.filter(w);
        }
        let count = query.count(db.pool()).await?;
        Ok(MetaQueryPayload { count })
    }
}
