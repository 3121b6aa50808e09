//! `ezpass get` — retrieve a stored password.
//!
//! The default copies the password to the clipboard (with timed
//! clearing) so it never appears on screen; `--show` prints it instead.
//! The session is closed before any clipboard work: the clear delay
//! blocks for many seconds and must not keep the vault lock held.

use std::time::Duration;

use zeroize::Zeroizing;

use crate::cli::{load_settings, output, prompt_passphrase, vault_storage, Cli};
use crate::clipboard::copy_to_clipboard;
use crate::errors::Result;
use crate::vault::Session;

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, username: &str, show: bool) -> Result<()> {
    let settings = load_settings()?;

    let passphrase = prompt_passphrase()?;
    let session = Session::open(vault_storage(cli)?, passphrase.as_bytes())?;

    let record = session.get(service, username)?;
    let secret = Zeroizing::new(record.secret.clone());
    let notes = record.notes.clone();

    // Lock released here; the secret lives on in our zeroizing copy.
    session.close();

    if show {
        println!("{}", *secret);
        if let Some(notes) = &notes {
            output::info(&format!("Notes: {notes}"));
        }
        return Ok(());
    }

    let clear_after = (settings.clipboard_clear_secs > 0)
        .then(|| Duration::from_secs(settings.clipboard_clear_secs));
    if let Some(delay) = clear_after {
        output::info(&format!(
            "Password for '{service}' copied to clipboard (clears in {} seconds)",
            delay.as_secs()
        ));
    } else {
        output::info(&format!("Password for '{service}' copied to clipboard"));
    }
    copy_to_clipboard(&secret, clear_after)?;

    Ok(())
}
