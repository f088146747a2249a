//! User interaction for destructive operations.
use crate::error::{Error, Result};
use dialoguer::Confirm;

/// Trait for asking the user yes/no questions.
pub trait Prompter {
    /// Asks `prompt` and returns the answer.
    ///
    /// # Arguments
    /// * `skip_prompt` - Answer yes without asking
    /// * `prompt` - Question shown to the user
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool>;
}

/// Terminal prompter built on dialoguer. Defaults to "no".
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip_prompt: bool, prompt: String) -> Result<bool> {
        if skip_prompt {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}
