use std::io;

use anyhow::Result;

use banko_bank::Ledger;
use banko_cli::ShellConfig;

fn main() -> Result<()> {
    let config = ShellConfig::from_env()?;
    banko_observability::init(config.log_format);

    if config.uses_default_credentials() {
        tracing::warn!("BANKO_ADMIN_USERNAME/BANKO_ADMIN_PASSWORD not set; using insecure dev defaults");
    }

    let mut ledger = Ledger::new(config.ledger);

    let stdin = io::stdin();
    let stdout = io::stdout();
    banko_cli::run(&mut ledger, &config, stdin.lock(), stdout.lock())
}
