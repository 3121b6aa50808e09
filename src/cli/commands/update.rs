//! `ezpass update` — replace the password of an existing credential.

use crate::cli::{output, prompt_passphrase, secret_value, vault_storage, Cli};
use crate::errors::Result;
use crate::vault::Session;

/// Execute the `update` command.
pub fn execute(cli: &Cli, service: &str, username: &str, secret: Option<&str>) -> Result<()> {
    let value = secret_value(secret, &format!("New password for '{service}'"))?;

    let passphrase = prompt_passphrase()?;
    let mut session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    session.update(service, username, |record| record.set_secret(&value))?;
    session.commit()?;
    session.close();

    output::success(&format!("Updated password for '{service}'"));
    Ok(())
}
