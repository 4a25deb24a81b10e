//! Address mutations

use async_graphql::{Context, Object, Result};
use chrono::Utc;
use storefront_macros::mutation_result;
use uuid::Uuid;

use crate::db::Database;
use crate::graphql::entities::{
    Address, AddressCreateInput, AddressUpdateInput, AddressWhereUniqueInput,
};
use crate::graphql::orm::{EntityQuery, SqlValue, execute_with_binds};

mutation_result!(AddressResult, address: Address);

#[derive(Default)]
pub struct AddressMutations;

#[Object]
impl AddressMutations {
    /// Create an address
    async fn create_address(
        &self,
        ctx: &Context<'_>,
        data: AddressCreateInput,
    ) -> Result<AddressResult> {
        let db = ctx.data_unchecked::<Database>();
        let now = Utc::now().to_rfc3339();
        let address = Address {
            id: Uuid::new_v4().to_string(),
            address_1: data.address_1,
            address_2: data.address_2,
            city: data.city,
            state: data.state,
            zip: data.zip,
            created_at: now.clone(),
            updated_at: now,
        };

        let sql = "INSERT INTO addresses \
                   (id, address_1, address_2, city, state, zip, created_at, updated_at) \
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
        let values = [
            SqlValue::String(address.id.clone()),
            address.address_1.clone().into(),
            address.address_2.clone().into(),
            address.city.clone().into(),
            address.state.clone().into(),
            address.zip.clone().into(),
            SqlValue::String(address.created_at.clone()),
            SqlValue::String(address.updated_at.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(AddressResult::success(address))
    }

    /// Update an address. Absent input fields are left unchanged.
    async fn update_address(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: AddressWhereUniqueInput,
        data: AddressUpdateInput,
    ) -> Result<AddressResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(mut address) = EntityQuery::<Address>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(AddressResult::error(format!(
                "address {} not found",
                where_.id
            )));
        };

        if let Some(address_1) = data.address_1 {
            address.address_1 = Some(address_1);
        }
        if let Some(address_2) = data.address_2 {
            address.address_2 = Some(address_2);
        }
        if let Some(city) = data.city {
            address.city = Some(city);
        }
        if let Some(state) = data.state {
            address.state = Some(state);
        }
        if let Some(zip) = data.zip {
            address.zip = Some(zip);
        }
        address.updated_at = Utc::now().to_rfc3339();

        let sql = "UPDATE addresses SET \
                   address_1 = ?1, address_2 = ?2, city = ?3, state = ?4, zip = ?5, \
                   updated_at = ?6 \
                   WHERE id = ?7";
        let values = [
            address.address_1.clone().into(),
            address.address_2.clone().into(),
            address.city.clone().into(),
            address.state.clone().into(),
            address.zip.clone().into(),
            SqlValue::String(address.updated_at.clone()),
            SqlValue::String(address.id.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(AddressResult::success(address))
    }

    /// Delete an address, returning the deleted record
    async fn delete_address(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: AddressWhereUniqueInput,
    ) -> Result<AddressResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(address) = EntityQuery::<Address>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(AddressResult::error(format!(
                "address {} not found",
                where_.id
            )));
        };

        let values = [SqlValue::String(address.id.clone())];
        execute_with_binds("DELETE FROM addresses WHERE id = ?1", &values, db.pool()).await?;

        Ok(AddressResult::success(address))
    }
}
