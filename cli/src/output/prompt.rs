//! Interactive confirmation via dialoguer.

use std::io;

use crate::application::ports::Confirmer;

/// Yes/no prompt on the terminal, defaulting to No.
///
/// Ctrl-C at the prompt surfaces as `io::ErrorKind::Interrupted`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(io::Error::from)
    }
}
