use feeclaim_core::error::RegistryError;
use feeclaim_core::types::{Address, Amount, ClaimId, Timestamp};
use feeclaim_registry::RegistryDb;

/// Query helpers for the fee registry.
pub struct RegistryQuery<'a> {
    db: &'a RegistryDb,
}

impl<'a> RegistryQuery<'a> {
    pub fn new(db: &'a RegistryDb) -> Self {
        Self { db }
    }

    pub fn is_registered(&self, participant: &Address) -> Result<bool, RegistryError> {
        self.db.is_registered(participant)
    }

    pub fn claim_id_of(&self, participant: &Address) -> Result<ClaimId, RegistryError> {
        self.db
            .participant(participant)?
            .map(|r| r.claim_id)
            .ok_or_else(|| RegistryError::Unregistered(participant.clone()))
    }

    /// Accrued fee balance for a claim. Unknown claim ids read as zero.
    pub fn balance_of(&self, claim_id: ClaimId) -> Result<Amount, RegistryError> {
        self.db.balance(claim_id)
    }

    pub fn administrator(&self) -> Result<Option<Address>, RegistryError> {
        self.db.administrator()
    }

    pub fn retroactive_deadline(&self) -> Result<Option<Timestamp>, RegistryError> {
        self.db.retroactive_deadline()
    }

    /// Whether the administrator may still register participants
    /// retroactively at `now`.
    pub fn retroactive_window_open(&self, now: Timestamp) -> Result<bool, RegistryError> {
        Ok(match self.db.retroactive_deadline()? {
            Some(deadline) => now <= deadline,
            None => false,
        })
    }

    /// Human-readable summary of a participant's registry state.
    pub fn describe(&self, participant: &Address) -> Result<String, RegistryError> {
        match self.db.participant(participant)? {
            Some(rec) => {
                let owed = self.db.balance(rec.claim_id)?;
                Ok(format!(
                    "{} — bound to claim {} ({} accrued)",
                    participant, rec.claim_id, owed
                ))
            }
            None => Ok(format!("{} — not registered", participant)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feeclaim_core::types::ParticipantRecord;

    fn temp_db(name: &str) -> RegistryDb {
        let dir = std::env::temp_dir().join(format!("feeclaim_query_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        RegistryDb::open(&dir).expect("open temp db")
    }

    fn addr(tag: u8) -> Address {
        Address::from_bytes([tag; 32])
    }

    #[test]
    fn queries_reflect_stored_state() {
        let db = temp_db("reflect");
        db.put_participant(&addr(1), &ParticipantRecord::bound_to(4)).unwrap();
        db.put_balance(4, 250).unwrap();

        let q = RegistryQuery::new(&db);
        assert!(q.is_registered(&addr(1)).unwrap());
        assert_eq!(q.claim_id_of(&addr(1)).unwrap(), 4);
        assert_eq!(q.balance_of(4).unwrap(), 250);
        assert_eq!(q.balance_of(5).unwrap(), 0);
        assert!(matches!(
            q.claim_id_of(&addr(2)).unwrap_err(),
            RegistryError::Unregistered(_)
        ));
    }

    #[test]
    fn window_open_tracks_deadline() {
        let db = temp_db("window");
        let q = RegistryQuery::new(&db);
        assert!(!q.retroactive_window_open(0).unwrap());

        db.set_retroactive_deadline(1_000).unwrap();
        let q = RegistryQuery::new(&db);
        assert!(q.retroactive_window_open(1_000).unwrap());
        assert!(!q.retroactive_window_open(1_001).unwrap());
    }

    #[test]
    fn describe_covers_both_states() {
        let db = temp_db("describe");
        db.put_participant(&addr(1), &ParticipantRecord::bound_to(0)).unwrap();
        db.put_balance(0, 42).unwrap();

        let q = RegistryQuery::new(&db);
        assert!(q.describe(&addr(1)).unwrap().contains("claim 0 (42 accrued)"));
        assert!(q.describe(&addr(2)).unwrap().ends_with("not registered"));
    }
}
