use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, ClaimId};

/// Observable outputs of the fee registry.
///
/// Exactly one event is emitted per successful state-changing operation and
/// none on failure. Events are buffered by the registry and drained by the
/// embedder; the registry itself keeps no event history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A participant registered and a fresh claim was minted to `recipient`.
    Registered {
        participant: Address,
        recipient: Address,
        claim_id: ClaimId,
    },

    /// A participant attached its fee stream to an already-minted claim.
    Assigned {
        participant: Address,
        claim_id: ClaimId,
    },

    /// Accrued fees were paid out to `recipient` by the claim holder.
    Withdrawn {
        claim_id: ClaimId,
        recipient: Address,
        amount: Amount,
    },

    /// Fees were credited to a claim's accrued balance.
    FeesDistributed { claim_id: ClaimId, amount: Amount },
}
