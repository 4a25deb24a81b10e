//! GraphQL schema assembly

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;

use super::mutations::{
    AddressMutations, CustomerMutations, OrderMutations, PaymentMutations, ProductMutations,
};
use super::queries::{
    AddressQueries, CustomerQueries, OrderQueries, PaymentQueries, ProductQueries,
};

/// Root query type merging the per-entity query objects.
#[derive(MergedObject, Default)]
pub struct QueryRoot(
    AddressQueries,
    CustomerQueries,
    OrderQueries,
    PaymentQueries,
    ProductQueries,
);

/// Root mutation type merging the per-entity mutation objects.
#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AddressMutations,
    CustomerMutations,
    OrderMutations,
    PaymentMutations,
    ProductMutations,
);

pub type StorefrontSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the database handle attached as context data.
pub fn build_schema(db: Database) -> StorefrontSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .finish()
}
