use feeclaim_core::error::RegistryError;
use feeclaim_core::types::{Address, Amount, ClaimId, ParticipantRecord, Timestamp};
use std::path::Path;

const META_ADMINISTRATOR: &str = "administrator";
const META_RETROACTIVE_DEADLINE: &str = "retroactive_deadline";

/// Persistent registry database backed by sled (pure-Rust, no C dependencies).
///
/// Named trees (analogous to column families):
///   participants — Address bytes        → bincode(ParticipantRecord)
///   balances     — ClaimId big-endian   → bincode(Amount)
///   meta         — utf8 key bytes       → bincode-encoded values
///
/// The two maps are intentionally independent: a balance entry carries no
/// foreign-key relationship to claim existence in the ledger.
pub struct RegistryDb {
    _db: sled::Db,
    participants: sled::Tree,
    balances: sled::Tree,
    meta: sled::Tree,
}

impl RegistryDb {
    /// Open or create the registry database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let db = sled::open(path).map_err(|e| RegistryError::Storage(e.to_string()))?;
        let participants = db
            .open_tree("participants")
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        let balances = db
            .open_tree("balances")
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        let meta = db
            .open_tree("meta")
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(Self {
            _db: db,
            participants,
            balances,
            meta,
        })
    }

    // ── Participants ─────────────────────────────────────────────────────────

    pub fn participant(&self, id: &Address) -> Result<Option<ParticipantRecord>, RegistryError> {
        match self
            .participants
            .get(id.as_bytes())
            .map_err(|e| RegistryError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let rec = bincode::deserialize(&bytes)
                    .map_err(|e| RegistryError::Serialization(e.to_string()))?;
                Ok(Some(rec))
            }
            None => Ok(None),
        }
    }

    pub fn put_participant(
        &self,
        id: &Address,
        record: &ParticipantRecord,
    ) -> Result<(), RegistryError> {
        let bytes = bincode::serialize(record)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.participants
            .insert(id.as_bytes(), bytes)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn is_registered(&self, id: &Address) -> Result<bool, RegistryError> {
        Ok(self.participant(id)?.map(|r| r.registered).unwrap_or(false))
    }

    // ── Balances ─────────────────────────────────────────────────────────────

    /// Accrued fee balance for a claim. Absent entries read as zero.
    pub fn balance(&self, claim_id: ClaimId) -> Result<Amount, RegistryError> {
        match self
            .balances
            .get(claim_id.to_be_bytes())
            .map_err(|e| RegistryError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let amount = bincode::deserialize(&bytes)
                    .map_err(|e| RegistryError::Serialization(e.to_string()))?;
                Ok(amount)
            }
            None => Ok(0),
        }
    }

    pub fn put_balance(&self, claim_id: ClaimId, amount: Amount) -> Result<(), RegistryError> {
        let bytes = bincode::serialize(&amount)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.balances
            .insert(claim_id.to_be_bytes(), bytes)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }

    // ── Meta ─────────────────────────────────────────────────────────────────

    pub fn administrator(&self) -> Result<Option<Address>, RegistryError> {
        match self
            .meta
            .get(META_ADMINISTRATOR.as_bytes())
            .map_err(|e| RegistryError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let addr = bincode::deserialize(&bytes)
                    .map_err(|e| RegistryError::Serialization(e.to_string()))?;
                Ok(Some(addr))
            }
            None => Ok(None),
        }
    }

    pub fn set_administrator(&self, admin: &Address) -> Result<(), RegistryError> {
        let bytes = bincode::serialize(admin)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.meta
            .insert(META_ADMINISTRATOR.as_bytes(), bytes)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn retroactive_deadline(&self) -> Result<Option<Timestamp>, RegistryError> {
        match self
            .meta
            .get(META_RETROACTIVE_DEADLINE.as_bytes())
            .map_err(|e| RegistryError::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let ts = bincode::deserialize(&bytes)
                    .map_err(|e| RegistryError::Serialization(e.to_string()))?;
                Ok(Some(ts))
            }
            None => Ok(None),
        }
    }

    pub fn set_retroactive_deadline(&self, deadline: Timestamp) -> Result<(), RegistryError> {
        let bytes = bincode::serialize(&deadline)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.meta
            .insert(META_RETROACTIVE_DEADLINE.as_bytes(), bytes)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), RegistryError> {
        self._db
            .flush()
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db(name: &str) -> RegistryDb {
        let dir = std::env::temp_dir().join(format!("feeclaim_db_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        RegistryDb::open(&dir).expect("open temp db")
    }

    #[test]
    fn absent_balance_reads_as_zero() {
        let db = temp_db("zero_balance");
        assert_eq!(db.balance(42).unwrap(), 0);
    }

    #[test]
    fn balance_roundtrip() {
        let db = temp_db("balance_rt");
        db.put_balance(3, 1_000_000).unwrap();
        assert_eq!(db.balance(3).unwrap(), 1_000_000);
        db.put_balance(3, 0).unwrap();
        assert_eq!(db.balance(3).unwrap(), 0);
    }

    #[test]
    fn participant_roundtrip() {
        let db = temp_db("participant_rt");
        let p = Address::from_bytes([9u8; 32]);
        assert!(db.participant(&p).unwrap().is_none());
        assert!(!db.is_registered(&p).unwrap());

        db.put_participant(&p, &ParticipantRecord::bound_to(7)).unwrap();
        let rec = db.participant(&p).unwrap().unwrap();
        assert_eq!(rec.claim_id, 7);
        assert!(rec.registered);
        assert!(db.is_registered(&p).unwrap());
    }

    #[test]
    fn meta_roundtrip() {
        let db = temp_db("meta_rt");
        assert!(db.administrator().unwrap().is_none());
        assert!(db.retroactive_deadline().unwrap().is_none());

        let admin = Address::from_bytes([1u8; 32]);
        db.set_administrator(&admin).unwrap();
        db.set_retroactive_deadline(1_700_000_000).unwrap();

        assert_eq!(db.administrator().unwrap().unwrap(), admin);
        assert_eq!(db.retroactive_deadline().unwrap().unwrap(), 1_700_000_000);
    }
}
