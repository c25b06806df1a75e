//! `banko-core` — domain building blocks for the banking ledger.
//!
//! This crate contains **pure domain** primitives (no IO, no terminal concerns).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;
pub mod money;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use event::Event;
pub use id::AccountId;
pub use money::Money;
