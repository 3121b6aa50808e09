//! `ezpass completions` — generate shell completion scripts.

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{EzPassError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell: Shell = shell
        .parse()
        .map_err(|_| EzPassError::CommandFailed(format!("unsupported shell '{shell}'")))?;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ezpass", &mut std::io::stdout());
    Ok(())
}
