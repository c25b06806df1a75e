use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use banko_core::{AccountId, Aggregate, AggregateRoot, DomainError, DomainResult, Event, Money};

/// Loans an account may take unless the ledger is configured otherwise.
pub const DEFAULT_LOAN_LIMIT: u32 = 2;

/// Aggregate root: Account.
///
/// Balances are fixed-point [`Money`]. Every mutation goes through
/// [`Aggregate::handle`] first, so a rejected operation never touches state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    name: String,
    email: String,
    address: String,
    account_type: String,
    balance: Money,
    loan_count: u32,
    loan_limit: u32,
    loan_principal: Money,
    history: Vec<AccountEvent>,
    version: u64,
}

impl Account {
    /// Open an account with zero balance and empty history.
    ///
    /// Only the ledger opens accounts; it is the sole owner of every instance.
    pub(crate) fn open(
        id: AccountId,
        name: String,
        email: String,
        address: String,
        account_type: String,
        loan_limit: u32,
    ) -> Self {
        Self {
            id,
            name,
            email,
            address,
            account_type,
            balance: Money::ZERO,
            loan_count: 0,
            loan_limit,
            loan_principal: Money::ZERO,
            history: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Free-form ("Savings", "Current", ...); not validated.
    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn check_balance(&self) -> Money {
        self.balance
    }

    pub fn loan_count(&self) -> u32 {
        self.loan_count
    }

    pub fn loan_limit(&self) -> u32 {
        self.loan_limit
    }

    /// Sum of loan proceeds credited to this account.
    pub fn loan_principal(&self) -> Money {
        self.loan_principal
    }

    /// Applied events, oldest first.
    pub fn transaction_history(&self) -> &[AccountEvent] {
        &self.history
    }

    pub fn deposit(&mut self, amount: Money) -> DomainResult<AccountEvent> {
        self.execute(&AccountCommand::Deposit {
            amount,
            occurred_at: Utc::now(),
        })
    }

    pub fn withdraw(&mut self, amount: Money) -> DomainResult<AccountEvent> {
        self.execute(&AccountCommand::Withdraw {
            amount,
            occurred_at: Utc::now(),
        })
    }

    /// Credit loan proceeds. Does not consult the ledger's loan flag; the
    /// ledger checks it before calling in.
    pub fn take_loan(&mut self, amount: Money) -> DomainResult<AccountEvent> {
        self.execute(&AccountCommand::TakeLoan {
            amount,
            occurred_at: Utc::now(),
        })
    }

    /// Move `amount` from this account to `recipient`.
    ///
    /// Funds are checked before the recipient, so an overdrawn transfer to a
    /// missing account reports `InsufficientFunds`. Both sides are decided
    /// before either is applied.
    pub fn transfer(
        &mut self,
        amount: Money,
        recipient: Option<&mut Account>,
    ) -> DomainResult<AccountEvent> {
        self.ensure_can_debit(amount)?;

        let Some(recipient) = recipient else {
            return Err(DomainError::account_not_found("transfer recipient"));
        };
        if recipient.id == self.id {
            return Err(DomainError::validation("cannot transfer to the same account"));
        }

        let occurred_at = Utc::now();
        let sent = self.decide(&AccountCommand::SendTransfer {
            to: recipient.id,
            amount,
            occurred_at,
        })?;
        let received = recipient.decide(&AccountCommand::ReceiveTransfer {
            from: self.id,
            amount,
            occurred_at,
        })?;

        self.apply(&sent);
        recipient.apply(&received);
        Ok(sent)
    }

    fn execute(&mut self, command: &AccountCommand) -> DomainResult<AccountEvent> {
        let event = self.decide(command)?;
        self.apply(&event);
        Ok(event)
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    Deposit {
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    Withdraw {
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    TakeLoan {
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    /// Debit side of a transfer.
    SendTransfer {
        to: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    /// Credit side of a transfer.
    ReceiveTransfer {
        from: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
}

/// One entry of an account's transaction history.
///
/// `Display` renders the human-readable history line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    Deposited {
        account_id: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    Withdrew {
        account_id: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    LoanTaken {
        account_id: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    TransferSent {
        account_id: AccountId,
        to: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
    TransferReceived {
        account_id: AccountId,
        from: AccountId,
        amount: Money,
        occurred_at: DateTime<Utc>,
    },
}

impl AccountEvent {
    pub fn account_id(&self) -> AccountId {
        match self {
            AccountEvent::Deposited { account_id, .. }
            | AccountEvent::Withdrew { account_id, .. }
            | AccountEvent::LoanTaken { account_id, .. }
            | AccountEvent::TransferSent { account_id, .. }
            | AccountEvent::TransferReceived { account_id, .. } => *account_id,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            AccountEvent::Deposited { amount, .. }
            | AccountEvent::Withdrew { amount, .. }
            | AccountEvent::LoanTaken { amount, .. }
            | AccountEvent::TransferSent { amount, .. }
            | AccountEvent::TransferReceived { amount, .. } => *amount,
        }
    }
}

impl core::fmt::Display for AccountEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountEvent::Deposited { amount, .. } => write!(f, "Deposited: {amount}"),
            AccountEvent::Withdrew { amount, .. } => write!(f, "Withdrew: {amount}"),
            AccountEvent::LoanTaken { amount, .. } => write!(f, "Loan taken: {amount}"),
            AccountEvent::TransferSent { to, amount, .. } => {
                write!(f, "Transferred: {amount} to {to}")
            }
            AccountEvent::TransferReceived { from, amount, .. } => {
                write!(f, "Received: {amount} from {from}")
            }
        }
    }
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::Deposited { .. } => "bank.account.deposited",
            AccountEvent::Withdrew { .. } => "bank.account.withdrew",
            AccountEvent::LoanTaken { .. } => "bank.account.loan_taken",
            AccountEvent::TransferSent { .. } => "bank.account.transfer_sent",
            AccountEvent::TransferReceived { .. } => "bank.account.transfer_received",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::Deposited { occurred_at, .. }
            | AccountEvent::Withdrew { occurred_at, .. }
            | AccountEvent::LoanTaken { occurred_at, .. }
            | AccountEvent::TransferSent { occurred_at, .. }
            | AccountEvent::TransferReceived { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Account {
    type Command = AccountCommand;
    type Event = AccountEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::Deposited { amount, .. }
            | AccountEvent::TransferReceived { amount, .. } => {
                self.balance += *amount;
            }
            AccountEvent::Withdrew { amount, .. } | AccountEvent::TransferSent { amount, .. } => {
                self.balance -= *amount;
            }
            AccountEvent::LoanTaken { amount, .. } => {
                self.balance += *amount;
                self.loan_principal += *amount;
                self.loan_count += 1;
            }
        }

        self.history.push(event.clone());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.decide(command).map(|event| vec![event])
    }
}

impl Account {
    /// Every command yields exactly one event; `handle` wraps this.
    fn decide(&self, command: &AccountCommand) -> DomainResult<AccountEvent> {
        match command {
            AccountCommand::Deposit {
                amount,
                occurred_at,
            } => {
                self.ensure_can_credit(*amount)?;
                Ok(AccountEvent::Deposited {
                    account_id: self.id,
                    amount: *amount,
                    occurred_at: *occurred_at,
                })
            }
            AccountCommand::Withdraw {
                amount,
                occurred_at,
            } => {
                self.ensure_can_debit(*amount)?;
                Ok(AccountEvent::Withdrew {
                    account_id: self.id,
                    amount: *amount,
                    occurred_at: *occurred_at,
                })
            }
            AccountCommand::TakeLoan {
                amount,
                occurred_at,
            } => {
                if self.loan_count >= self.loan_limit {
                    return Err(DomainError::LoanLimitReached {
                        limit: self.loan_limit,
                    });
                }
                self.ensure_can_credit(*amount)?;
                if self.loan_principal.checked_add(*amount).is_none() {
                    return Err(DomainError::validation("loan would overflow loan principal"));
                }
                Ok(AccountEvent::LoanTaken {
                    account_id: self.id,
                    amount: *amount,
                    occurred_at: *occurred_at,
                })
            }
            AccountCommand::SendTransfer {
                to,
                amount,
                occurred_at,
            } => {
                self.ensure_can_debit(*amount)?;
                Ok(AccountEvent::TransferSent {
                    account_id: self.id,
                    to: *to,
                    amount: *amount,
                    occurred_at: *occurred_at,
                })
            }
            AccountCommand::ReceiveTransfer {
                from,
                amount,
                occurred_at,
            } => {
                self.ensure_can_credit(*amount)?;
                Ok(AccountEvent::TransferReceived {
                    account_id: self.id,
                    from: *from,
                    amount: *amount,
                    occurred_at: *occurred_at,
                })
            }
        }
    }

    fn ensure_can_credit(&self, amount: Money) -> DomainResult<()> {
        ensure_positive(amount)?;
        if self.balance.checked_add(amount).is_none() {
            return Err(DomainError::validation("amount would overflow balance"));
        }
        Ok(())
    }

    fn ensure_can_debit(&self, amount: Money) -> DomainResult<()> {
        ensure_positive(amount)?;
        if amount > self.balance {
            return Err(DomainError::insufficient_funds(amount, self.balance));
        }
        Ok(())
    }
}

fn ensure_positive(amount: Money) -> DomainResult<()> {
    if !amount.is_positive() {
        return Err(DomainError::validation("amount must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_account(name: &str) -> Account {
        Account::open(
            AccountId::new(),
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "1 Main St".to_string(),
            "Savings".to_string(),
            DEFAULT_LOAN_LIMIT,
        )
    }

    fn money(major: i64) -> Money {
        Money::from_major(major).unwrap()
    }

    #[test]
    fn new_account_is_empty() {
        let account = test_account("Alice");
        assert_eq!(account.check_balance(), Money::ZERO);
        assert!(account.transaction_history().is_empty());
        assert_eq!(account.loan_count(), 0);
        assert_eq!(account.version(), 0);
    }

    #[test]
    fn deposit_credits_balance_and_records_history() {
        let mut account = test_account("Alice");
        let event = account.deposit(money(100)).unwrap();

        assert_eq!(account.check_balance(), money(100));
        assert_eq!(event.to_string(), "Deposited: 100.00");
        assert_eq!(account.transaction_history(), &[event]);
        assert_eq!(account.version(), 1);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut account = test_account("Alice");
        let mut bob = test_account("Bob");
        account.deposit(money(10)).unwrap();

        for amount in [Money::ZERO, money(-5)] {
            assert!(matches!(account.deposit(amount), Err(DomainError::Validation(_))));
            assert!(matches!(account.withdraw(amount), Err(DomainError::Validation(_))));
            assert!(matches!(account.take_loan(amount), Err(DomainError::Validation(_))));
            assert!(matches!(
                account.transfer(amount, Some(&mut bob)),
                Err(DomainError::Validation(_))
            ));
        }
        assert_eq!(account.check_balance(), money(10));
        assert_eq!(account.transaction_history().len(), 1);
        assert_eq!(bob.check_balance(), Money::ZERO);
        assert!(bob.transaction_history().is_empty());
    }

    #[test]
    fn overdrawn_withdrawal_is_rejected_without_mutation() {
        let mut account = test_account("Alice");
        account.deposit(money(40)).unwrap();

        let err = account.withdraw(money(50)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_funds(money(50), money(40)));
        assert_eq!(account.check_balance(), money(40));
        assert_eq!(account.transaction_history().len(), 1);
    }

    #[test]
    fn withdrawing_the_whole_balance_is_allowed() {
        let mut account = test_account("Alice");
        account.deposit(money(40)).unwrap();
        let event = account.withdraw(money(40)).unwrap();

        assert_eq!(event.to_string(), "Withdrew: 40.00");
        assert_eq!(account.check_balance(), Money::ZERO);
    }

    #[test]
    fn third_loan_hits_the_limit() {
        let mut account = test_account("Alice");
        account.take_loan(money(20)).unwrap();
        account.take_loan(money(20)).unwrap();

        let err = account.take_loan(money(20)).unwrap_err();
        assert_eq!(err, DomainError::LoanLimitReached { limit: 2 });
        assert_eq!(account.check_balance(), money(40));
        assert_eq!(account.loan_count(), 2);
        assert_eq!(account.loan_principal(), money(40));
    }

    #[test]
    fn transfer_moves_funds_and_records_both_sides() {
        let mut alice = test_account("Alice");
        let mut bob = test_account("Bob");
        alice.deposit(money(100)).unwrap();

        let sent = alice.transfer(money(40), Some(&mut bob)).unwrap();

        assert_eq!(alice.check_balance(), money(60));
        assert_eq!(bob.check_balance(), money(40));
        assert_eq!(sent.to_string(), format!("Transferred: 40.00 to {}", bob.id_typed()));
        assert_eq!(
            bob.transaction_history()[0].to_string(),
            format!("Received: 40.00 from {}", alice.id_typed())
        );
    }

    #[test]
    fn funds_are_checked_before_recipient() {
        let mut alice = test_account("Alice");
        alice.deposit(money(10)).unwrap();

        let err = alice.transfer(money(50), None).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientFunds { .. }));

        let err = alice.transfer(money(5), None).unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
        assert_eq!(alice.check_balance(), money(10));
    }

    #[test]
    fn rejected_credit_leaves_sender_untouched() {
        let mut alice = test_account("Alice");
        let mut bob = test_account("Bob");
        alice.deposit(money(10)).unwrap();
        bob.deposit(Money::from_minor(i64::MAX)).unwrap();

        let err = alice.transfer(money(5), Some(&mut bob)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(alice.check_balance(), money(10));
        assert_eq!(alice.transaction_history().len(), 1);
    }

    #[test]
    fn handle_does_not_mutate() {
        let account = test_account("Alice");
        let events = account
            .handle(&AccountCommand::Deposit {
                amount: money(5),
                occurred_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "bank.account.deposited");
        assert_eq!(account.check_balance(), Money::ZERO);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: balance after N deposits from zero equals their sum.
        #[test]
        fn balance_is_sum_of_deposits(
            amounts in prop::collection::vec(1i64..1_000_000i64, 1..20)
        ) {
            let mut account = test_account("Alice");
            for minor in &amounts {
                account.deposit(Money::from_minor(*minor)).unwrap();
            }
            prop_assert_eq!(account.check_balance().minor_units(), amounts.iter().sum::<i64>());
            prop_assert_eq!(account.transaction_history().len(), amounts.len());
        }

        /// Property: a transfer conserves the pair's combined balance,
        /// whether it succeeds or not.
        #[test]
        fn transfer_conserves_pair_total(
            funded in 0i64..1_000_000i64,
            amount in 1i64..2_000_000i64,
        ) {
            let mut alice = test_account("Alice");
            let mut bob = test_account("Bob");
            if funded > 0 {
                alice.deposit(Money::from_minor(funded)).unwrap();
            }

            let result = alice.transfer(Money::from_minor(amount), Some(&mut bob));

            prop_assert_eq!(
                alice.check_balance().minor_units() + bob.check_balance().minor_units(),
                funded
            );
            prop_assert_eq!(result.is_ok(), amount <= funded);
            prop_assert!(alice.check_balance() >= Money::ZERO);
        }
    }
}
