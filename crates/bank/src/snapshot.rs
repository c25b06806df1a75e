//! Serializable views of the ledger, used for export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use banko_core::{AccountId, Event, Money};

use crate::account::{Account, AccountEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub loans_enabled: bool,
    /// Minor units.
    pub total_balance: Money,
    /// Minor units.
    pub total_loan_amount: Money,
    pub accounts: Vec<AccountSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub account_type: String,
    pub balance: Money,
    pub loan_count: u32,
    pub loan_principal: Money,
    pub history: Vec<HistoryLine>,
}

/// A history entry as displayed to the holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
}

impl From<&AccountEvent> for HistoryLine {
    fn from(event: &AccountEvent) -> Self {
        Self {
            event_type: event.event_type().to_string(),
            occurred_at: event.occurred_at(),
            description: event.to_string(),
        }
    }
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id_typed(),
            name: account.name().to_string(),
            email: account.email().to_string(),
            address: account.address().to_string(),
            account_type: account.account_type().to_string(),
            balance: account.check_balance(),
            loan_count: account.loan_count(),
            loan_principal: account.loan_principal(),
            history: account
                .transaction_history()
                .iter()
                .map(HistoryLine::from)
                .collect(),
        }
    }
}
