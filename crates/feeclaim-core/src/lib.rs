pub mod constants;
pub mod error;
pub mod event;
pub mod ledger;
pub mod types;

pub use constants::*;
pub use error::RegistryError;
pub use event::RegistryEvent;
pub use ledger::{ClaimLedger, ValueTransfer};
pub use types::*;
