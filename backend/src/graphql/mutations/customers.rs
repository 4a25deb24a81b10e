//! Customer mutations

use async_graphql::{Context, Object, Result};
use chrono::Utc;
use storefront_macros::mutation_result;
use uuid::Uuid;

use crate::db::Database;
use crate::graphql::entities::{
    Customer, CustomerCreateInput, CustomerUpdateInput, CustomerWhereUniqueInput,
};
use crate::graphql::orm::{EntityQuery, SqlValue, execute_with_binds};

mutation_result!(CustomerResult, customer: Customer);

#[derive(Default)]
pub struct CustomerMutations;

#[Object]
impl CustomerMutations {
    /// Create a customer
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        data: CustomerCreateInput,
    ) -> Result<CustomerResult> {
        let db = ctx.data_unchecked::<Database>();
        let now = Utc::now().to_rfc3339();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            address_id: data.address.map(|a| a.id),
            created_at: now.clone(),
            updated_at: now,
        };

        let sql = "INSERT INTO customers \
                   (id, first_name, last_name, email, phone, address_id, created_at, updated_at) \
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
        let values = [
            SqlValue::String(customer.id.clone()),
            customer.first_name.clone().into(),
            customer.last_name.clone().into(),
            customer.email.clone().into(),
            customer.phone.clone().into(),
            customer.address_id.clone().into(),
            SqlValue::String(customer.created_at.clone()),
            SqlValue::String(customer.updated_at.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(CustomerResult::success(customer))
    }

    /// Update a customer. Absent input fields are left unchanged.
    async fn update_customer(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: CustomerWhereUniqueInput,
        data: CustomerUpdateInput,
    ) -> Result<CustomerResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(mut customer) = EntityQuery::<Customer>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(CustomerResult::error(format!(
                "customer {} not found",
                where_.id
            )));
        };

        if let Some(first_name) = data.first_name {
            customer.first_name = Some(first_name);
        }
        if let Some(last_name) = data.last_name {
            customer.last_name = Some(last_name);
        }
        if let Some(email) = data.email {
            customer.email = Some(email);
        }
        if let Some(phone) = data.phone {
            customer.phone = Some(phone);
        }
        if let Some(address) = data.address {
            customer.address_id = Some(address.id);
        }
        customer.updated_at = Utc::now().to_rfc3339();

        let sql = "UPDATE customers SET \
                   first_name = ?1, last_name = ?2, email = ?3, phone = ?4, \
                   address_id = ?5, updated_at = ?6 \
                   WHERE id = ?7";
        let values = [
            customer.first_name.clone().into(),
            customer.last_name.clone().into(),
            customer.email.clone().into(),
            customer.phone.clone().into(),
            customer.address_id.clone().into(),
            SqlValue::String(customer.updated_at.clone()),
            SqlValue::String(customer.id.clone()),
        ];
        execute_with_binds(sql, &values, db.pool()).await?;

        Ok(CustomerResult::success(customer))
    }

    /// Delete a customer, returning the deleted record
    async fn delete_customer(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] where_: CustomerWhereUniqueInput,
    ) -> Result<CustomerResult> {
        let db = ctx.data_unchecked::<Database>();
        let Some(customer) = EntityQuery::<Customer>::new()
            .filter(&where_)
            .fetch_optional(db.pool())
            .await?
        else {
            return Ok(CustomerResult::error(format!(
                "customer {} not found",
                where_.id
            )));
        };

        let values = [SqlValue::String(customer.id.clone())];
        execute_with_binds("DELETE FROM customers WHERE id = ?1", &values, db.pool()).await?;

        Ok(CustomerResult::success(customer))
    }
}
