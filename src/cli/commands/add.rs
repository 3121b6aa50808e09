//! `ezpass add` — store an existing password for a service.

use crate::cli::{output, prompt_passphrase, secret_value, vault_storage, Cli};
use crate::errors::Result;
use crate::vault::{CredentialRecord, Session};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    notes: Option<&str>,
    secret: Option<&str>,
) -> Result<()> {
    let value = secret_value(secret, &format!("Password for '{service}'"))?;

    let passphrase = prompt_passphrase()?;
    let mut session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    session.add(CredentialRecord::new(service, username, &value, notes)?)?;
    session.commit()?;
    session.close();

    output::success(&format!("Stored password for '{service}'"));
    Ok(())
}
