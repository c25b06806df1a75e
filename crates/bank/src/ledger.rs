use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use banko_core::{AccountId, DomainError, DomainResult, Money};

use crate::account::{Account, AccountEvent, DEFAULT_LOAN_LIMIT};
use crate::snapshot::{AccountSnapshot, LedgerSnapshot};

/// Ledger-wide settings fixed at construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Initial state of the loan feature flag.
    pub loans_enabled: bool,
    /// Loan limit given to every account opened by this ledger.
    pub max_loans_per_account: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            loans_enabled: true,
            max_loans_per_account: DEFAULT_LOAN_LIMIT,
        }
    }
}

/// The bank: sole owner of every account it opens.
///
/// Accounts are keyed by [`AccountId`]. Ids are time-ordered, so iteration
/// (listing, `find_account`) follows creation order.
///
/// Callers only ever get `&Account` back; every mutation is routed through a
/// ledger method, which is where the loan flag is enforced.
#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: BTreeMap<AccountId, Account>,
    loan_enabled: bool,
    config: LedgerConfig,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            accounts: BTreeMap::new(),
            loan_enabled: config.loans_enabled,
            config,
        }
    }

    /// Open a new account. Always succeeds: no duplicate detection.
    pub fn create_account(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        account_type: impl Into<String>,
    ) -> &Account {
        let id = AccountId::new();
        let account = Account::open(
            id,
            name.into(),
            email.into(),
            address.into(),
            account_type.into(),
            self.config.max_loans_per_account,
        );

        tracing::info!(
            account_id = %id,
            account_type = %account.account_type(),
            "account created"
        );

        self.accounts.entry(id).or_insert(account)
    }

    /// Remove an account and hand it back.
    ///
    /// Outstanding balance and loans are not checked; whatever the account
    /// held leaves the ledger with it.
    pub fn delete_account(&mut self, id: &AccountId) -> DomainResult<Account> {
        let account = self
            .accounts
            .remove(id)
            .ok_or_else(|| DomainError::account_not_found(id))?;

        if account.check_balance().is_zero() {
            tracing::info!(account_id = %id, "account deleted");
        } else {
            tracing::warn!(
                account_id = %id,
                balance = %account.check_balance(),
                loan_count = account.loan_count(),
                "account deleted with non-zero balance"
            );
        }

        Ok(account)
    }

    /// Account ids in creation order.
    pub fn get_all_accounts(&self) -> Vec<AccountId> {
        self.accounts.keys().copied().collect()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn check_total_balance(&self) -> Money {
        self.accounts.values().map(Account::check_balance).sum()
    }

    /// Outstanding loan principal across all accounts.
    pub fn check_total_loan_amount(&self) -> Money {
        self.accounts.values().map(Account::loan_principal).sum()
    }

    /// Switch the loan feature; returns the new state.
    pub fn toggle_loan_feature(&mut self, enabled: bool) -> bool {
        self.loan_enabled = enabled;
        tracing::info!(enabled, "loan feature toggled");
        self.loan_enabled
    }

    pub fn loans_enabled(&self) -> bool {
        self.loan_enabled
    }

    /// First account (in creation order) whose name and address both match
    /// exactly. Nothing stops two accounts sharing a (name, address) pair; the
    /// older one wins.
    pub fn find_account(&self, name: &str, address: &str) -> Option<&Account> {
        let found = self
            .accounts
            .values()
            .find(|account| account.name() == name && account.address() == address);

        tracing::debug!(found = found.is_some(), "account lookup by name and address");
        found
    }

    pub fn check_balance(&self, id: &AccountId) -> DomainResult<Money> {
        self.account(id)
            .map(Account::check_balance)
            .ok_or_else(|| DomainError::account_not_found(id))
    }

    pub fn transaction_history(&self, id: &AccountId) -> DomainResult<&[AccountEvent]> {
        self.account(id)
            .map(Account::transaction_history)
            .ok_or_else(|| DomainError::account_not_found(id))
    }

    pub fn deposit(&mut self, id: &AccountId, amount: Money) -> DomainResult<AccountEvent> {
        let event = self.account_mut(id)?.deposit(amount)?;
        tracing::info!(account_id = %id, amount = %amount, "deposit");
        Ok(event)
    }

    pub fn withdraw(&mut self, id: &AccountId, amount: Money) -> DomainResult<AccountEvent> {
        let event = self.account_mut(id)?.withdraw(amount)?;
        tracing::info!(account_id = %id, amount = %amount, "withdrawal");
        Ok(event)
    }

    /// Credit a loan, refusing with `LoansDisabled` while the feature is off.
    pub fn take_loan(&mut self, id: &AccountId, amount: Money) -> DomainResult<AccountEvent> {
        if !self.loan_enabled {
            tracing::warn!(account_id = %id, "loan refused: feature disabled");
            return Err(DomainError::LoansDisabled);
        }

        let event = self.account_mut(id)?.take_loan(amount)?;
        tracing::info!(account_id = %id, amount = %amount, "loan taken");
        Ok(event)
    }

    /// Move funds between two accounts held by this ledger.
    ///
    /// Failure order: same-account, unknown sender, non-positive amount,
    /// insufficient funds, unknown recipient.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Money,
    ) -> DomainResult<AccountEvent> {
        if from == to {
            return Err(DomainError::validation("cannot transfer to the same account"));
        }

        // Detach the recipient so both accounts can be borrowed mutably.
        let mut recipient = self.accounts.remove(to);
        let recipient_missing = recipient.is_none();
        let outcome = match self.accounts.get_mut(from) {
            Some(sender) => sender
                .transfer(amount, recipient.as_mut())
                .map_err(|err| match err {
                    DomainError::AccountNotFound(_) if recipient_missing => {
                        DomainError::account_not_found(to)
                    }
                    other => other,
                }),
            None => Err(DomainError::account_not_found(from)),
        };
        if let Some(recipient) = recipient {
            self.accounts.insert(*to, recipient);
        }

        if outcome.is_ok() {
            tracing::info!(from = %from, to = %to, amount = %amount, "transfer");
        }
        outcome
    }

    /// Serializable view of the whole ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            loans_enabled: self.loan_enabled,
            total_balance: self.check_total_balance(),
            total_loan_amount: self.check_total_loan_amount(),
            accounts: self.accounts.values().map(AccountSnapshot::from).collect(),
        }
    }

    fn account_mut(&mut self, id: &AccountId) -> DomainResult<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| DomainError::account_not_found(id))
    }
}
