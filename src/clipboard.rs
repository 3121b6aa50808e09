//! System clipboard integration with timed clearing.
//!
//! Copied passwords should not sit in the clipboard forever.  After the
//! configured delay the clipboard is cleared again — but only if it
//! still holds the password we put there, so anything the user copied
//! in the meantime survives.

use std::time::Duration;

use zeroize::Zeroizing;

use crate::errors::{EzPassError, Result};

/// Copy `text` to the system clipboard.
///
/// With `clear_after` set, blocks until the delay elapses and then
/// clears the clipboard.  Callers should tell the user about the delay
/// before invoking this.
pub fn copy_to_clipboard(text: &str, clear_after: Option<Duration>) -> Result<()> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| EzPassError::Clipboard(format!("failed to copy: {e}")))?;

    if let Some(delay) = clear_after {
        // Keep our own copy for the comparison; wiped on drop.
        let ours = Zeroizing::new(text.to_string());
        drop(clipboard);

        std::thread::sleep(delay);

        let mut clipboard = open_clipboard()?;
        match clipboard.get_text() {
            Ok(current) if current == *ours => {
                clipboard
                    .clear()
                    .map_err(|e| EzPassError::Clipboard(format!("failed to clear: {e}")))?;
            }
            // The user copied something else since; leave it alone.
            _ => {}
        }
    }

    Ok(())
}

fn open_clipboard() -> Result<arboard::Clipboard> {
    arboard::Clipboard::new()
        .map_err(|e| EzPassError::Clipboard(format!("clipboard unavailable: {e}")))
}
