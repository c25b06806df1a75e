//! Interactive text-menu shell over the banking ledger.
//!
//! The shell owns no state of its own: the ledger and configuration are
//! passed in, and input/output are any `BufRead` / `Write` pair.

pub mod config;
pub mod messages;
pub mod prompt;
pub mod shell;

pub use config::ShellConfig;
pub use shell::run;
