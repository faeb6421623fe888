use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee amount in base units. u128 leaves ample headroom above any realistic
/// accrual; arithmetic on balances is always checked.
pub type Amount = u128;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Sequential claim identifier, assigned at mint time as the ledger's current
/// total supply: 0, 1, 2, … with no gaps and no reuse.
pub type ClaimId = u64;

// ── Address ──────────────────────────────────────────────────────────────────

/// 32-byte opaque participant/holder identifier.
///
/// The all-zero address is the null identifier; it is never a valid recipient
/// of a claim or a payout.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The null identifier.
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Base-58 encoded string representation.
    pub fn to_b58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    pub fn from_b58(s: &str) -> Result<Self, bs58::decode::Error> {
        let bytes = bs58::decode(s).into_vec()?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| bs58::decode::Error::BufferTooSmall)?;
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_b58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_b58()[..8])
    }
}

// ── ParticipantRecord ────────────────────────────────────────────────────────

/// Per-participant registry record stored in the `participants` sled tree.
///
/// At most one record exists per participant. `registered` is monotonic: the
/// registry never clears it once set, and no deletion operation exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// The claim entitled to this participant's fees.
    pub claim_id: ClaimId,
    /// True once a claim has been bound to this participant.
    pub registered: bool,
}

impl ParticipantRecord {
    pub fn bound_to(claim_id: ClaimId) -> Self {
        Self {
            claim_id,
            registered: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_b58_roundtrip() {
        let a = Address::from_bytes([7u8; 32]);
        let s = a.to_b58();
        assert_eq!(Address::from_b58(&s).unwrap(), a);
    }

    #[test]
    fn address_b58_wrong_length_rejected() {
        // Decodes to a single byte.
        assert!(Address::from_b58("z").is_err());
        // Decodes to 33 bytes.
        let long = bs58::encode([7u8; 33]).into_string();
        assert!(Address::from_b58(&long).is_err());
    }

    #[test]
    fn null_address_detected() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1u8; 32]).is_zero());
    }
}
