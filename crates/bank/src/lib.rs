//! Banking domain: accounts and the ledger that owns them.
//!
//! Pure in-memory domain logic: no IO, no terminal, no persistence.

pub mod account;
pub mod ledger;
pub mod snapshot;

pub use account::{Account, AccountCommand, AccountEvent, DEFAULT_LOAN_LIMIT};
pub use ledger::{Ledger, LedgerConfig};
pub use snapshot::{AccountSnapshot, HistoryLine, LedgerSnapshot};
