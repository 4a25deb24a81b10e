//! GraphQL ORM Layer
//!
//! Traits and utilities shared by the entity modules: a single source of
//! truth for filter inputs (WhereInput), sort inputs (OrderByInput),
//! parameterized SQL generation, and row decoding.
//!
//! # Query style
//!
//! ```rust,ignore
//! use crate::graphql::entities::{Customer, CustomerWhereInput};
//! use crate::graphql::filters::StringFilter;
//!
//! let customers = EntityQuery::<Customer>::new()
//!     .filter(&CustomerWhereInput {
//!         email: Some(StringFilter::contains("@example.com")),
//!         ..Default::default()
//!     })
//!     .fetch_all(&pool)
//!     .await?;
//! ```

mod builder;
mod traits;

pub use builder::*;
pub use traits::*;
