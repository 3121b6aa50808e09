//! `ezpass delete` — remove a credential from the vault.

use dialoguer::Confirm;

use crate::cli::{output, prompt_passphrase, vault_storage, Cli};
use crate::errors::{EzPassError, Result};
use crate::vault::Session;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, username: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the credential for '{service}'?"))
            .default(false)
            .interact()
            .map_err(|e| EzPassError::CommandFailed(format!("failed to read confirmation: {e}")))?;
        if !confirmed {
            return Err(EzPassError::UserCancelled);
        }
    }

    let passphrase = prompt_passphrase()?;
    let mut session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    session.delete(service, username)?;
    session.commit()?;
    session.close();

    output::success(&format!("Deleted credential for '{service}'"));
    Ok(())
}
