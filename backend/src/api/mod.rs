//! API route definitions
//!
//! The primary API is GraphQL at /graphql. One REST endpoint is kept for
//! the admin tooling's order search, which sends bracket-notation query
//! strings instead of GraphQL documents.

pub mod compose;
pub mod health;
pub mod nested_query;
pub mod orders;
