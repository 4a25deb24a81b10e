//! GraphQL query roots, one module per entity.

mod addresses;
mod customers;
pub mod orders;
mod payments;
mod products;

pub use addresses::AddressQueries;
pub use customers::CustomerQueries;
pub use orders::OrderQueries;
pub use payments::PaymentQueries;
pub use products::ProductQueries;

/// Count payload returned by the `*Meta` queries.
#[derive(async_graphql::SimpleObject, Debug)]
#[graphql(name = "MetaQueryPayload")]
pub struct MetaQueryPayload {
    pub count: i64,
}

/// Validate offset pagination arguments.
pub(crate) fn page_args(
    skip: Option<i64>,
    take: Option<i64>,
) -> async_graphql::Result<(Option<i64>, Option<i64>)> {
    if skip.is_some_and(|s| s < 0) {
        return Err(async_graphql::Error::new("skip must not be negative"));
    }
    if take.is_some_and(|t| t < 0) {
        return Err(async_graphql::Error::new("take must not be negative"));
    }
    Ok((skip, take))
}

/// Shared imports for the per-entity query modules.
pub(crate) mod prelude {
    pub use async_graphql::{Context, Object, Result};

    pub use crate::db::Database;
    pub use crate::graphql::orm::EntityQuery;

    pub use super::MetaQueryPayload;
    pub(crate) use super::page_args;
}

#[cfg(test)]
mod tests {
    use super::page_args;

    #[test]
    fn page_args_accepts_zero_and_positive_values() {
        assert!(page_args(Some(0), Some(0)).is_ok());
        assert!(page_args(Some(5), Some(10)).is_ok());
        assert!(page_args(None, None).is_ok());
    }

    #[test]
    fn page_args_rejects_negative_values() {
        assert!(page_args(Some(-1), None).is_err());
        assert!(page_args(None, Some(-1)).is_err());
    }
}
