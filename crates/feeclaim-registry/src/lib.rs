//! feeclaim-registry
//!
//! The Fee Registry: binds fee-generating participants to transferable
//! claims and accounts for the fees owed to each claim. Claim ownership
//! lives in a `ClaimLedger` collaborator and payouts go through a
//! `ValueTransfer` collaborator; this crate owns the two keyed stores
//! (participant records and per-claim balances) and the invariants across
//! them.

pub mod db;
pub mod memory;
pub mod registry;

pub use db::RegistryDb;
pub use memory::{MemoryBank, MemoryClaimLedger};
pub use registry::FeeRegistry;
