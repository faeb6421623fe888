//! feeclaim-query
//!
//! Read-only query layer over the registry database. The state mutations
//! live in feeclaim-registry's FeeRegistry; this crate answers questions
//! about participants, balances, and the retroactive window without
//! touching the claim ledger or the value-transfer collaborator.

pub mod query;

pub use query::RegistryQuery;
