use std::collections::{BTreeMap, BTreeSet};

use feeclaim_core::error::RegistryError;
use feeclaim_core::ledger::{ClaimLedger, ValueTransfer};
use feeclaim_core::types::{Address, Amount, ClaimId};

/// In-memory claim ledger.
///
/// Reference implementation of the ownership primitive: claim id = index into
/// the holder list, so ids are sequential from 0 and `total_supply` is the
/// next id to be assigned.
#[derive(Default)]
pub struct MemoryClaimLedger {
    holders: Vec<Address>,
}

impl MemoryClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimLedger for MemoryClaimLedger {
    fn mint(&mut self, to: &Address) -> Result<ClaimId, RegistryError> {
        let id = self.holders.len() as ClaimId;
        self.holders.push(to.clone());
        Ok(id)
    }

    fn owner_of(&self, id: ClaimId) -> Result<Address, RegistryError> {
        self.holders
            .get(id as usize)
            .cloned()
            .ok_or(RegistryError::ClaimNotFound(id))
    }

    fn exists(&self, id: ClaimId) -> bool {
        (id as usize) < self.holders.len()
    }

    fn total_supply(&self) -> u64 {
        self.holders.len() as u64
    }

    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        id: ClaimId,
    ) -> Result<(), RegistryError> {
        let holder = self
            .holders
            .get_mut(id as usize)
            .ok_or(RegistryError::ClaimNotFound(id))?;
        if holder != from {
            return Err(RegistryError::NotClaimHolder(id));
        }
        *holder = to.clone();
        Ok(())
    }
}

/// In-memory value transfer.
///
/// Credits recipients in a map; recipients marked via `reject` refuse the
/// payment, which lets tests exercise the withdrawal rollback path.
#[derive(Default)]
pub struct MemoryBank {
    credited: BTreeMap<Address, Amount>,
    rejected: BTreeSet<Address>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an address as refusing all payments.
    pub fn reject(&mut self, addr: Address) {
        self.rejected.insert(addr);
    }

    /// Total amount credited to `addr` so far.
    pub fn credited_to(&self, addr: &Address) -> Amount {
        self.credited.get(addr).copied().unwrap_or(0)
    }
}

impl ValueTransfer for MemoryBank {
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), RegistryError> {
        if self.rejected.contains(to) {
            return Err(RegistryError::TransferRejected(to.clone()));
        }
        *self.credited.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 32])
    }

    #[test]
    fn ledger_mints_sequential_ids() {
        let mut ledger = MemoryClaimLedger::new();
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.mint(&addr(1)).unwrap(), 0);
        assert_eq!(ledger.mint(&addr(2)).unwrap(), 1);
        assert_eq!(ledger.mint(&addr(1)).unwrap(), 2);
        assert_eq!(ledger.total_supply(), 3);
        assert_eq!(ledger.owner_of(2).unwrap(), addr(1));
        assert!(ledger.exists(2));
        assert!(!ledger.exists(3));
    }

    #[test]
    fn ledger_owner_of_unminted_fails() {
        let ledger = MemoryClaimLedger::new();
        assert!(matches!(
            ledger.owner_of(0).unwrap_err(),
            RegistryError::ClaimNotFound(0)
        ));
    }

    #[test]
    fn ledger_transfer_checks_holder() {
        let mut ledger = MemoryClaimLedger::new();
        ledger.mint(&addr(1)).unwrap();

        assert!(matches!(
            ledger.transfer(&addr(2), &addr(3), 0).unwrap_err(),
            RegistryError::NotClaimHolder(0)
        ));
        ledger.transfer(&addr(1), &addr(3), 0).unwrap();
        assert_eq!(ledger.owner_of(0).unwrap(), addr(3));
    }

    #[test]
    fn bank_credits_and_rejects() {
        let mut bank = MemoryBank::new();
        bank.send(&addr(1), 40).unwrap();
        bank.send(&addr(1), 2).unwrap();
        assert_eq!(bank.credited_to(&addr(1)), 42);

        bank.reject(addr(2));
        assert!(matches!(
            bank.send(&addr(2), 1).unwrap_err(),
            RegistryError::TransferRejected(_)
        ));
        assert_eq!(bank.credited_to(&addr(2)), 0);
    }
}
