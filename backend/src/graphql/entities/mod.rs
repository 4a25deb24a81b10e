// Base entities (no outgoing relations)
pub mod address;
pub mod product;

// Entities with relations
pub mod customer;
pub mod order;
pub mod payment;

// Re-export all entity types
pub use address::*;
pub use customer::*;
pub use order::*;
pub use payment::*;
pub use product::*;
