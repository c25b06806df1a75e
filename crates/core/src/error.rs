//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Fieldless discriminant of [`DomainError`].
///
/// Callers (the menu shell) branch on this instead of matching message text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientFunds,
    AccountNotFound,
    LoanLimitReached,
    LoansDisabled,
    InvalidArgument,
    InvalidId,
}

/// Domain-level error.
///
/// All variants are local, recoverable conditions. None of them leave an
/// account partially mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A withdrawal or transfer asked for more than the balance holds.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    /// No account is registered under the given identifier.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The account already took the maximum number of loans.
    #[error("loan limit reached ({limit} per account)")]
    LoanLimitReached { limit: u32 },

    /// Loans are switched off ledger-wide.
    #[error("loan feature is disabled")]
    LoansDisabled,

    /// A value failed validation (non-positive amount, malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn account_not_found(account: impl core::fmt::Display) -> Self {
        Self::AccountNotFound(account.to_string())
    }

    pub fn insufficient_funds(requested: Money, available: Money) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            DomainError::AccountNotFound(_) => ErrorKind::AccountNotFound,
            DomainError::LoanLimitReached { .. } => ErrorKind::LoanLimitReached,
            DomainError::LoansDisabled => ErrorKind::LoansDisabled,
            DomainError::Validation(_) => ErrorKind::InvalidArgument,
            DomainError::InvalidId(_) => ErrorKind::InvalidId,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        let err = DomainError::insufficient_funds(Money::from_minor(500), Money::from_minor(100));
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(
            err.to_string(),
            "insufficient funds: requested 5.00, available 1.00"
        );

        assert_eq!(DomainError::validation("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            DomainError::LoanLimitReached { limit: 2 }.kind(),
            ErrorKind::LoanLimitReached
        );
    }
}
