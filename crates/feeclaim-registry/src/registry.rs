use std::collections::BTreeSet;
use std::sync::Arc;

use feeclaim_core::constants::RETROACTIVE_WINDOW_SECS;
use feeclaim_core::error::RegistryError;
use feeclaim_core::event::RegistryEvent;
use feeclaim_core::ledger::{ClaimLedger, ValueTransfer};
use feeclaim_core::types::{Address, Amount, ClaimId, ParticipantRecord, Timestamp};
use tracing::{info, warn};

use crate::db::RegistryDb;

/// The fee registry engine.
///
/// Owns the persistent participant and balance stores and drives the two
/// collaborators: the claim ledger (identity and ownership of claims) and the
/// value-transfer primitive (paying out a holder). Every operation is
/// all-or-nothing: each validates fully before mutating, so a failed call
/// leaves no partial state.
///
/// The execution model is single-threaded; callers needing concurrency must
/// serialize access externally.
pub struct FeeRegistry<L, V> {
    db: Arc<RegistryDb>,
    ledger: L,
    bank: V,
    events: Vec<RegistryEvent>,
}

impl<L: ClaimLedger, V: ValueTransfer> FeeRegistry<L, V> {
    /// Open the registry over an existing database.
    ///
    /// On first initialization this fixes the retroactive registration
    /// deadline at `now + RETROACTIVE_WINDOW_SECS` and records `admin` as the
    /// administrator; on reopen both come from the database unchanged, so the
    /// deadline can never be extended by reinitializing.
    pub fn open(
        db: Arc<RegistryDb>,
        ledger: L,
        bank: V,
        admin: &Address,
        now: Timestamp,
    ) -> Result<Self, RegistryError> {
        if db.administrator()?.is_none() {
            if admin.is_zero() {
                return Err(RegistryError::InvalidRecipient);
            }
            db.set_administrator(admin)?;
        }
        if db.retroactive_deadline()?.is_none() {
            db.set_retroactive_deadline(now + RETROACTIVE_WINDOW_SECS)?;
        }
        Ok(Self {
            db,
            ledger,
            bank,
            events: Vec::new(),
        })
    }

    pub fn db(&self) -> &RegistryDb {
        &self.db
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn bank(&self) -> &V {
        &self.bank
    }

    /// Events emitted since the last drain, in operation order.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// The fixed point in time after which retroactive registration is
    /// permanently disabled.
    pub fn retroactive_deadline(&self) -> Result<Timestamp, RegistryError> {
        self.db
            .retroactive_deadline()?
            .ok_or_else(|| RegistryError::Storage("retroactive deadline missing".into()))
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// Whether `participant` has ever been bound to a claim. Monotonic: once
    /// true, never false again.
    pub fn is_registered(&self, participant: &Address) -> Result<bool, RegistryError> {
        self.db.is_registered(participant)
    }

    /// The claim entitled to `participant`'s fees.
    pub fn claim_id_of(&self, participant: &Address) -> Result<ClaimId, RegistryError> {
        self.db
            .participant(participant)?
            .map(|r| r.claim_id)
            .ok_or_else(|| RegistryError::Unregistered(participant.clone()))
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// One-time self-registration: mint a fresh claim to `recipient` and bind
    /// `caller`'s fee stream to it. Consumes exactly one claim id.
    pub fn register(
        &mut self,
        caller: &Address,
        recipient: &Address,
    ) -> Result<ClaimId, RegistryError> {
        if self.db.is_registered(caller)? {
            return Err(RegistryError::AlreadyRegistered(caller.clone()));
        }
        if recipient.is_zero() {
            return Err(RegistryError::InvalidRecipient);
        }

        let claim_id = self.ledger.mint(recipient)?;
        self.db
            .put_participant(caller, &ParticipantRecord::bound_to(claim_id))?;

        info!(participant = %caller, recipient = %recipient, claim_id, "registered participant");
        self.events.push(RegistryEvent::Registered {
            participant: caller.clone(),
            recipient: recipient.clone(),
            claim_id,
        });
        Ok(claim_id)
    }

    /// Administrator-driven bulk registration of pre-existing participants,
    /// permitted only until the retroactive deadline.
    ///
    /// All-or-nothing across the batch: every pair is validated (null
    /// recipients, already-registered participants, duplicates within the
    /// batch) before the first mint, so a rejected batch mints nothing and
    /// binds nothing; bindings are then written only after every mint has
    /// succeeded, so a ledger failure partway leaves no participant bound.
    /// Returns minted claim ids in input order.
    pub fn retroactive_register(
        &mut self,
        caller: &Address,
        participants: &[Address],
        recipients: &[Address],
        now: Timestamp,
    ) -> Result<Vec<ClaimId>, RegistryError> {
        self.require_administrator(caller)?;

        let deadline = self.retroactive_deadline()?;
        if now > deadline {
            return Err(RegistryError::RetroactiveWindowClosed {
                closed_at: deadline,
            });
        }
        if participants.len() != recipients.len() {
            return Err(RegistryError::MismatchedBatchLengths {
                participants: participants.len(),
                recipients: recipients.len(),
            });
        }

        // Validate the whole batch before minting anything.
        let mut seen: BTreeSet<&Address> = BTreeSet::new();
        for (participant, recipient) in participants.iter().zip(recipients) {
            if recipient.is_zero() {
                return Err(RegistryError::InvalidRecipient);
            }
            if self.db.is_registered(participant)? || !seen.insert(participant) {
                return Err(RegistryError::AlreadyRegistered(participant.clone()));
            }
        }

        // Mint the whole batch before binding anyone: a collaborator failure
        // on pair k must not leave pairs 0..k durably bound.
        let mut claim_ids = Vec::with_capacity(participants.len());
        for recipient in recipients {
            claim_ids.push(self.ledger.mint(recipient)?);
        }

        let mut emitted = Vec::with_capacity(participants.len());
        for ((participant, recipient), claim_id) in
            participants.iter().zip(recipients).zip(&claim_ids)
        {
            self.db
                .put_participant(participant, &ParticipantRecord::bound_to(*claim_id))?;
            emitted.push(RegistryEvent::Registered {
                participant: participant.clone(),
                recipient: recipient.clone(),
                claim_id: *claim_id,
            });
        }
        self.events.extend(emitted);

        info!(
            administrator = %caller,
            count = claim_ids.len(),
            "retroactively registered participants"
        );
        Ok(claim_ids)
    }

    /// Bind `caller`'s fee stream to an already-minted claim without minting
    /// a new one.
    ///
    /// Fees accrued for `caller` before this call are not recoverable through
    /// the new binding.
    pub fn assign(&mut self, caller: &Address, claim_id: ClaimId) -> Result<ClaimId, RegistryError> {
        if self.db.is_registered(caller)? {
            return Err(RegistryError::AlreadyRegistered(caller.clone()));
        }
        if !self.ledger.exists(claim_id) {
            return Err(RegistryError::ClaimNotFound(claim_id));
        }

        self.db
            .put_participant(caller, &ParticipantRecord::bound_to(claim_id))?;

        info!(participant = %caller, claim_id, "assigned participant to existing claim");
        self.events.push(RegistryEvent::Assigned {
            participant: caller.clone(),
            claim_id,
        });
        Ok(claim_id)
    }

    // ── Accounting ───────────────────────────────────────────────────────────

    /// Credit fees to a claim's accrued balance. Administrator-gated.
    ///
    /// Claim existence is deliberately not checked: crediting an id the
    /// ledger has never minted succeeds and the amount simply sits
    /// unreachable until such a claim exists. This mirrors a permissive
    /// upstream behavior that may well be a lost-fees bug, so it is logged.
    pub fn distribute_fees(
        &mut self,
        caller: &Address,
        claim_id: ClaimId,
        amount: Amount,
    ) -> Result<(), RegistryError> {
        self.require_administrator(caller)?;
        if amount == 0 {
            return Err(RegistryError::NothingToDistribute);
        }

        let owed = self.db.balance(claim_id)?;
        let updated = owed
            .checked_add(amount)
            .ok_or(RegistryError::BalanceOverflow(claim_id))?;

        if !self.ledger.exists(claim_id) {
            warn!(claim_id, %amount, "crediting a claim the ledger has never minted");
        }

        self.db.put_balance(claim_id, updated)?;

        info!(claim_id, %amount, total = %updated, "distributed fees");
        self.events
            .push(RegistryEvent::FeesDistributed { claim_id, amount });
        Ok(())
    }

    /// Pay out accrued fees to `recipient`. Only the current holder of the
    /// claim (per the ledger) may withdraw.
    ///
    /// A request larger than the accrued balance clamps silently to the full
    /// balance, so `withdraw(.., Amount::MAX)` always means "everything
    /// available". The balance decrement is written before the payout runs;
    /// a collaborator that re-enters the registry therefore observes the
    /// already-reduced balance. If the payout fails, the prior balance is
    /// restored and the call fails.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        claim_id: ClaimId,
        recipient: &Address,
        amount: Amount,
    ) -> Result<Amount, RegistryError> {
        let holder = self.ledger.owner_of(claim_id)?;
        if holder != *caller {
            return Err(RegistryError::NotClaimHolder(claim_id));
        }

        let owed = self.db.balance(claim_id)?;
        if owed == 0 || amount == 0 {
            return Err(RegistryError::NothingToWithdraw);
        }
        let paying = amount.min(owed);

        self.db.put_balance(claim_id, owed - paying)?;

        if let Err(e) = self.bank.send(recipient, paying) {
            self.db.put_balance(claim_id, owed)?;
            return Err(RegistryError::PayoutFailed(e.to_string()));
        }

        info!(claim_id, recipient = %recipient, amount = %paying, "withdrew fees");
        self.events.push(RegistryEvent::Withdrawn {
            claim_id,
            recipient: recipient.clone(),
            amount: paying,
        });
        Ok(paying)
    }

    // ── Administration ───────────────────────────────────────────────────────

    /// Hand the administrator role to another address. Gated on the current
    /// administrator.
    pub fn transfer_administration(
        &mut self,
        caller: &Address,
        new_admin: &Address,
    ) -> Result<(), RegistryError> {
        self.require_administrator(caller)?;
        if new_admin.is_zero() {
            return Err(RegistryError::InvalidRecipient);
        }
        self.db.set_administrator(new_admin)?;
        info!(from = %caller, to = %new_admin, "transferred administration");
        Ok(())
    }

    fn require_administrator(&self, caller: &Address) -> Result<(), RegistryError> {
        match self.db.administrator()? {
            Some(admin) if admin == *caller => Ok(()),
            _ => Err(RegistryError::NotAdministrator),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
