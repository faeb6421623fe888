use thiserror::Error;

use crate::types::{Address, ClaimId, Timestamp};

#[derive(Debug, Error)]
pub enum RegistryError {
    // ── Authorization errors ─────────────────────────────────────────────────
    #[error("caller is not the administrator")]
    NotAdministrator,

    #[error("caller does not hold claim {0}")]
    NotClaimHolder(ClaimId),

    // ── State-conflict errors ────────────────────────────────────────────────
    #[error("participant already registered: {0}")]
    AlreadyRegistered(Address),

    #[error("participant not registered: {0}")]
    Unregistered(Address),

    // ── Input-validation errors ──────────────────────────────────────────────
    #[error("recipient must not be the null address")]
    InvalidRecipient,

    #[error("claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("participant and recipient lists differ in length: {participants} vs {recipients}")]
    MismatchedBatchLengths {
        participants: usize,
        recipients: usize,
    },

    // ── Temporal errors ──────────────────────────────────────────────────────
    #[error("retroactive registration window closed at {closed_at}")]
    RetroactiveWindowClosed { closed_at: Timestamp },

    // ── No-op guards ─────────────────────────────────────────────────────────
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("nothing to distribute")]
    NothingToDistribute,

    // ── Accounting ───────────────────────────────────────────────────────────
    #[error("fee balance overflow for claim {0}")]
    BalanceOverflow(ClaimId),

    // ── Collaborators ────────────────────────────────────────────────────────
    #[error("payout failed: {0}")]
    PayoutFailed(String),

    #[error("transfer rejected by recipient: {0}")]
    TransferRejected(Address),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}
