//! Menu loops: main menu, user menu, admin menu.
//!
//! End of input leaves the current menu; at the main menu it ends the session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use banko_bank::{AccountEvent, Ledger};
use banko_core::{AccountId, DomainResult, Money};

use crate::config::ShellConfig;
use crate::messages::{confirmation, describe_error};
use crate::prompt::Prompt;

const MAIN_MENU: &str = "\nMain Menu:\n\
1. User System\n\
2. User Login\n\
3. Admin System\n\
4. Exit";

const USER_MENU: &str = "\nUser Menu:\n\
1. Deposit\n\
2. Withdraw\n\
3. Check Balance\n\
4. Transaction History\n\
5. Take Loan\n\
6. Transfer\n\
7. Exit";

const ADMIN_MENU: &str = "\nAdmin Menu:\n\
1. Create Account\n\
2. Delete Account\n\
3. List All Accounts\n\
4. Check Total Balance\n\
5. Check Total Loan Amount\n\
6. Toggle Loan Feature\n\
7. Export Snapshot (JSON)\n\
8. Exit";

const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

/// Run an interactive session against `ledger` until the user exits or
/// input ends.
pub fn run<R: BufRead, W: Write>(
    ledger: &mut Ledger,
    config: &ShellConfig,
    input: R,
    output: W,
) -> Result<()> {
    Shell {
        ledger,
        config,
        io: Prompt::new(input, output),
    }
    .main_menu()
}

struct Shell<'a, R, W> {
    ledger: &'a mut Ledger,
    config: &'a ShellConfig,
    io: Prompt<R, W>,
}

impl<R: BufRead, W: Write> Shell<'_, R, W> {
    fn main_menu(&mut self) -> Result<()> {
        self.io.say("Welcome to the Banking Management System!")?;

        loop {
            self.io.say(MAIN_MENU)?;
            let Some(choice) = self.io.ask("Enter your choice: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => self.user_system()?,
                "2" => self.user_login()?,
                "3" => self.admin_system()?,
                "4" => break,
                _ => self.io.say(INVALID_CHOICE)?,
            }
        }

        self.io.say("Thank you for using the Banking Management System!")
    }

    fn user_system(&mut self) -> Result<()> {
        self.io.say("Welcome to the User System!")?;
        let Some(id) = self.open_account("your", "Your account number is")? else {
            return Ok(());
        };
        self.user_menu(id)
    }

    fn user_login(&mut self) -> Result<()> {
        self.io.say("User Login")?;
        let Some(name) = self.io.ask("Enter your name: ")? else {
            return Ok(());
        };
        let Some(address) = self.io.ask("Enter your address: ")? else {
            return Ok(());
        };

        match self.ledger.find_account(&name, &address).map(|a| a.id_typed()) {
            Some(id) => {
                self.io
                    .say(format!("Login successful! Your account number is: {id}"))?;
                self.user_menu(id)
            }
            None => self
                .io
                .say("Account not found. Please check your name and address."),
        }
    }

    fn user_menu(&mut self, id: AccountId) -> Result<()> {
        loop {
            self.io.say(USER_MENU)?;
            let Some(choice) = self.io.ask("Enter your choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if let Some(amount) = self.ask_amount("Enter deposit amount: ")? {
                        let outcome = self.ledger.deposit(&id, amount);
                        self.report(outcome)?;
                    }
                }
                "2" => {
                    if let Some(amount) = self.ask_amount("Enter withdrawal amount: ")? {
                        let outcome = self.ledger.withdraw(&id, amount);
                        self.report(outcome)?;
                    }
                }
                "3" => match self.ledger.check_balance(&id) {
                    Ok(balance) => self.io.say(format!("Current Balance: {balance}"))?,
                    Err(err) => self.io.say(describe_error(&err))?,
                },
                "4" => match self.ledger.transaction_history(&id) {
                    Ok(history) => {
                        self.io.say("Transaction History:")?;
                        for entry in history {
                            self.io.say(entry.to_string())?;
                        }
                    }
                    Err(err) => self.io.say(describe_error(&err))?,
                },
                "5" => {
                    if let Some(amount) = self.ask_amount("Enter loan amount: ")? {
                        let outcome = self.ledger.take_loan(&id, amount);
                        self.report(outcome)?;
                    }
                }
                "6" => self.transfer_from(id)?,
                "7" => return Ok(()),
                _ => self.io.say(INVALID_CHOICE)?,
            }
        }
    }

    fn transfer_from(&mut self, id: AccountId) -> Result<()> {
        let Some(raw) = self.io.ask("Enter recipient account number: ")? else {
            return Ok(());
        };
        let recipient = match raw.parse::<AccountId>() {
            Ok(recipient) => recipient,
            Err(err) => return self.io.say(describe_error(&err)),
        };
        if let Some(amount) = self.ask_amount("Enter transfer amount: ")? {
            let outcome = self.ledger.transfer(&id, &recipient, amount);
            self.report(outcome)?;
        }
        Ok(())
    }

    fn admin_system(&mut self) -> Result<()> {
        self.io.say("Welcome to the Admin System!")?;
        let Some(username) = self.io.ask("Enter admin username: ")? else {
            return Ok(());
        };
        let Some(password) = self.io.ask("Enter admin password: ")? else {
            return Ok(());
        };

        if !self.config.admin_credentials_match(&username, &password) {
            tracing::warn!(username = %username, "admin login rejected");
            return self.io.say("Invalid username or password.");
        }

        self.io.say("Admin login successful!")?;
        self.admin_menu()
    }

    fn admin_menu(&mut self) -> Result<()> {
        loop {
            self.io.say(ADMIN_MENU)?;
            let Some(choice) = self.io.ask("Enter your choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    self.open_account("user's", "Account Number")?;
                }
                "2" => self.delete_account()?,
                "3" => {
                    self.io.say("List of all accounts:")?;
                    for id in self.ledger.get_all_accounts() {
                        if let Some(account) = self.ledger.account(&id) {
                            self.io.say(format!(
                                "Name: {}, Account Number: {}",
                                account.name(),
                                id
                            ))?;
                        }
                    }
                }
                "4" => {
                    let total = self.ledger.check_total_balance();
                    self.io.say(format!("Total Balance: {total}"))?;
                }
                "5" => {
                    let total = self.ledger.check_total_loan_amount();
                    self.io.say(format!("Total Loan Amount: {total}"))?;
                }
                "6" => {
                    let Some(status) = self.io.ask("Enter loan feature status (True/False): ")?
                    else {
                        return Ok(());
                    };
                    let enabled = self
                        .ledger
                        .toggle_loan_feature(status.eq_ignore_ascii_case("true"));
                    let shown = if enabled { "True" } else { "False" };
                    self.io.say(format!("Loan feature set to {shown}"))?;
                }
                "7" => {
                    let json = serde_json::to_string_pretty(&self.ledger.snapshot())
                        .context("failed to serialize ledger snapshot")?;
                    self.io.say(json)?;
                }
                "8" => return Ok(()),
                _ => self.io.say(INVALID_CHOICE)?,
            }
        }
    }

    fn delete_account(&mut self) -> Result<()> {
        let Some(raw) = self.io.ask("Enter account number to delete: ")? else {
            return Ok(());
        };
        let outcome = raw
            .parse::<AccountId>()
            .and_then(|id| self.ledger.delete_account(&id));
        match outcome {
            Ok(account) => self.io.say(format!(
                "Account {} deleted successfully.",
                account.id_typed()
            )),
            Err(err) => self.io.say(describe_error(&err)),
        }
    }

    /// Ask for holder details and open an account. `Ok(None)` at end of input.
    fn open_account(&mut self, whose: &str, announce: &str) -> Result<Option<AccountId>> {
        let Some(name) = self.io.ask(&format!("Enter {whose} name: "))? else {
            return Ok(None);
        };
        let Some(email) = self.io.ask(&format!("Enter {whose} email: "))? else {
            return Ok(None);
        };
        let Some(address) = self.io.ask(&format!("Enter {whose} address: "))? else {
            return Ok(None);
        };
        let Some(account_type) = self
            .io
            .ask(&format!("Enter {whose} account type (Savings/Current): "))?
        else {
            return Ok(None);
        };

        let id = self
            .ledger
            .create_account(name, email, address, account_type)
            .id_typed();
        self.io
            .say(format!("Account created successfully! {announce}: {id}"))?;
        Ok(Some(id))
    }

    /// `Ok(None)` at end of input or after reporting an unparsable amount.
    fn ask_amount(&mut self, label: &str) -> Result<Option<Money>> {
        let Some(raw) = self.io.ask(label)? else {
            return Ok(None);
        };
        match raw.parse::<Money>() {
            Ok(amount) => Ok(Some(amount)),
            Err(err) => {
                self.io.say(describe_error(&err))?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, outcome: DomainResult<AccountEvent>) -> Result<()> {
        match outcome {
            Ok(event) => self.io.say(confirmation(&event)),
            Err(err) => self.io.say(describe_error(&err)),
        }
    }
}
