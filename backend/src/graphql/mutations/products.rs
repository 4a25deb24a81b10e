//! Product mutations

use async_graphql::{Context, Object, Result};
use chrono::Utc;
use storefront_macros::mutation_result;
use uuid::Uuid;

use crate::db::Database;
use crate::graphql::entities::{
    Product, ProductCreateInput, ProductUpdateInput, ProductWhereUniqueInput,
};
use crate::graphql::orm::{EntityQuery, SqlValue, execute_with_binds};

mutation_result!(ProductResult, product: Product);

#[derive(Default)]
pub struct ProductMutations;

#[Object]
impl ProductMutations {
    /// Create a product
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        data: ProductCreateInput,
    ) -> Result<ProductResult> {
        let db = ctx.data_unchecked::<Database>();
        let now = Utc::now().to_rfc3339();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            item_price: data.item_price,
            created_at: now.clone(),
            updated_at: now,
        };

        let sql = "INSERT INTO products \
                   (id, name, description, item_price, created_at, updated_at) \
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let values = [
            SqlValue::String(product.id.clone()),
            product.name.clone().into(),
            product.description.clone().into(),
            product.item_price.into(),
            SqlValue::String(product.created_at.clone()),
            SqlValue::String(product.updated_at.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(ProductResult::success(product))
    }

    /// Update a product. Absent input fields are left unchanged.
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: ProductWhereUniqueInput,
        data: ProductUpdateInput,
    ) -> Result<ProductResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(mut product) = EntityQuery::<Product>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(ProductResult::error(format!(
                "product {} not found",
                where_.id
            )));
        };

        if let Some(name) = data.name {
            product.name = Some(name);
        }
        if let Some(description) = data.description {
            product.description = Some(description);
        }
        if let Some(item_price) = data.item_price {
            product.item_price = Some(item_price);
        }
        product.updated_at = Utc::now().to_rfc3339();

        let sql = "UPDATE products SET \
                   name = ?1, description = ?2, item_price = ?3, updated_at = ?4 \
                   WHERE id = ?5";
        let values = [
            product.name.clone().into(),
            product.description.clone().into(),
            product.item_price.into(),
            SqlValue::String(product.updated_at.clone()),
            SqlValue::String(product.id.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(ProductResult::success(product))
    }

    /// Delete a product, returning the deleted record
    async fn delete_product(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: ProductWhereUniqueInput,
    ) -> Result<ProductResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(product) = EntityQuery::<Product>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(ProductResult::error(format!(
                "product {} not found",
                where_.id
            )));
        };

        let values = [SqlValue::String(product.id.clone())];
        execute_with_binds("DELETE FROM products WHERE id = ?1", &values, db.pool()).await?;

        Ok(ProductResult::success(product))
    }
}
