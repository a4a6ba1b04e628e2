//! Core operations behind the HTTP routes.
//!
//! Field read-modify-write logic is written against [`fields::FieldStore`],
//! so it runs unchanged over the Admin API or an in-memory store.

pub mod customers;
pub mod favorites;
pub mod fields;
pub mod interactions;
pub mod locks;
pub mod pagination;
pub mod spas;

pub use fields::FieldStore;
pub use locks::OwnerLocks;
