use crate::error::RegistryError;
use crate::types::{Address, Amount, ClaimId};

/// The claim-ownership primitive the registry builds on.
///
/// The registry does not track who holds a claim; it delegates identity and
/// ownership entirely to this collaborator. Implementations must assign ids
/// sequentially from the current total supply (0, 1, 2, … with no gaps and
/// no reuse) and must keep a claim in existence forever once minted.
pub trait ClaimLedger {
    /// Allocate the next sequential claim id to `to`.
    fn mint(&mut self, to: &Address) -> Result<ClaimId, RegistryError>;

    /// Current holder of a claim. Fails with `ClaimNotFound` if the id has
    /// never been minted.
    fn owner_of(&self, id: ClaimId) -> Result<Address, RegistryError>;

    /// Whether the id has been minted.
    fn exists(&self, id: ClaimId) -> bool;

    /// Total number of claims minted so far (= the next id to be assigned).
    fn total_supply(&self) -> u64;

    /// Move a claim between holders. Fails unless `from` is the current
    /// holder.
    fn transfer(&mut self, from: &Address, to: &Address, id: ClaimId)
        -> Result<(), RegistryError>;
}

/// The value-movement primitive used to pay out a holder.
///
/// `send` is all-or-nothing: it either fully credits `to` or fails without
/// moving anything. Partial transfer is not possible.
pub trait ValueTransfer {
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), RegistryError>;
}
