//! `ezpass list` — list all stored credentials (metadata only).

use crate::cli::{output, prompt_passphrase, vault_storage, Cli};
use crate::errors::Result;
use crate::vault::{RecordMetadata, Session};

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let passphrase = prompt_passphrase()?;
    let session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    let records: Vec<RecordMetadata> = session.list().map(RecordMetadata::from).collect();
    output::print_credentials_table(&records);

    session.close();
    Ok(())
}
