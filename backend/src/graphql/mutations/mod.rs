//! GraphQL mutation roots, one module per entity.
//!
//! Result types follow the success/error envelope generated by
//! `mutation_result!` so clients always get a structured payload instead
//! of a bare GraphQL error for not-found targets.

mod addresses;
mod customers;
mod orders;
mod payments;
mod products;

pub use addresses::AddressMutations;
pub use customers::CustomerMutations;
pub use orders::OrderMutations;
pub use payments::PaymentMutations;
pub use products::ProductMutations;
