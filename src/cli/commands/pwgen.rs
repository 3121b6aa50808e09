//! `ezpass pwgen` — generate a password without touching any vault.

use crate::cli::{load_settings, PolicyArgs};
use crate::errors::Result;
use crate::generator::generate_password;

/// Execute the `pwgen` command.
pub fn execute(policy_args: &PolicyArgs) -> Result<()> {
    let settings = load_settings()?;
    let password = generate_password(&policy_args.to_policy(&settings))?;
    println!("{}", *password);
    Ok(())
}
