//! `ezpass generate` — generate a password and store it for a service.

use std::time::Duration;

use crate::cli::{
    load_settings, output, prompt_passphrase, vault_storage, Cli, PolicyArgs,
};
use crate::clipboard::copy_to_clipboard;
use crate::errors::Result;
use crate::generator::generate_password;
use crate::vault::{CredentialRecord, Session};

/// Execute the `generate` command.
#[allow(clippy::fn_params_excessive_bools)]
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    policy_args: &PolicyArgs,
    copy: bool,
    show: bool,
) -> Result<()> {
    let settings = load_settings()?;
    let policy = policy_args.to_policy(&settings);

    // Generate before unlocking so a bad policy fails without a prompt.
    let password = generate_password(&policy)?;

    let passphrase = prompt_passphrase()?;
    let mut session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    session.add(CredentialRecord::new(service, username, &password, None)?)?;
    session.commit()?;

    // Lock released before any clipboard work: the clear delay blocks
    // for many seconds and must not keep the vault lock held.
    session.close();

    output::success(&format!("Generated and stored password for '{service}'"));

    if show {
        println!("{}", *password);
    }

    if copy {
        let clear_after = (settings.clipboard_clear_secs > 0)
            .then(|| Duration::from_secs(settings.clipboard_clear_secs));
        if let Some(delay) = clear_after {
            output::info(&format!(
                "Password copied to clipboard (clears in {} seconds)",
                delay.as_secs()
            ));
        } else {
            output::info("Password copied to clipboard");
        }
        copy_to_clipboard(&password, clear_after)?;
    }

    Ok(())
}
