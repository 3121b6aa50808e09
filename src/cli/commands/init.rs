//! `ezpass init` — create a new, empty vault.

use crate::cli::{load_settings, output, prompt_new_passphrase, vault_path, vault_storage, Cli};
use crate::errors::Result;
use crate::vault::Session;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let path = vault_path(cli)?;
    let settings = load_settings()?;

    let passphrase = prompt_new_passphrase()?;

    let session = Session::create(vault_storage(cli)?, passphrase.as_bytes(), &settings.kdf_params())?;
    session.close();

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `ezpass generate <service>` to store your first password.");
    output::tip("Run `ezpass list` to see stored credentials.");

    Ok(())
}
