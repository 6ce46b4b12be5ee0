//! Terminal prompts backed by `dialoguer`.
//!
//! Widgets draw on stderr, so stdout stays clean for `--json` output.

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, Select};
use secmerge_core::{Error, Prompter, Result};

/// [`Prompter`] for an interactive terminal.
pub struct DialoguerPrompter {
    theme: Box<dyn Theme>,
}

impl std::fmt::Debug for DialoguerPrompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialoguerPrompter").finish_non_exhaustive()
    }
}

impl DialoguerPrompter {
    /// Colored widgets, or plain ones when `colors` is false.
    #[must_use]
    pub fn new(colors: bool) -> Self {
        let theme: Box<dyn Theme> = if colors {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        };
        Self { theme }
    }
}

fn prompt_error(kind: &str, error: dialoguer::Error) -> Error {
    match error {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => Error::Aborted,
        other => Error::prompt(format!("{kind} error: {other}")),
    }
}

impl Prompter for DialoguerPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        Select::with_theme(&*self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|e| prompt_error("Selection", e))?
            .ok_or(Error::Aborted)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&*self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| prompt_error("Input", e))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&*self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .map_err(|e| prompt_error("Confirmation", e))?
            .ok_or(Error::Aborted)
    }
}
