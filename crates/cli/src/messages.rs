//! Display text for ledger outcomes.

use banko_bank::AccountEvent;
use banko_core::{DomainError, ErrorKind};

/// Confirmation line for a successful operation.
pub fn confirmation(event: &AccountEvent) -> String {
    let amount = event.amount();
    match event {
        AccountEvent::Deposited { .. } => format!("{amount} deposited successfully."),
        AccountEvent::Withdrew { .. } => format!("{amount} withdrawn successfully."),
        AccountEvent::LoanTaken { .. } => format!("Loan of {amount} taken successfully."),
        AccountEvent::TransferSent { .. } | AccountEvent::TransferReceived { .. } => {
            format!("{amount} transferred successfully.")
        }
    }
}

/// Text shown for a failed operation, chosen by error kind.
pub fn describe_error(err: &DomainError) -> String {
    let headline = match err.kind() {
        ErrorKind::InsufficientFunds => "Insufficient funds",
        ErrorKind::AccountNotFound => "Account does not exist",
        ErrorKind::LoanLimitReached => "Loan limit reached",
        ErrorKind::LoansDisabled => "Loan feature is currently disabled",
        ErrorKind::InvalidArgument => "Invalid input",
        ErrorKind::InvalidId => "Invalid account number",
    };
    format!("{headline} ({err})")
}
