pub mod entities;
pub mod extended;
pub mod filters;
pub mod mutations;
pub mod orm;
pub mod queries;
mod schema;

pub use schema::{StorefrontSchema, build_schema};
