//! Operator interaction seam.
//!
//! The CLI implements [`Prompter`] with terminal widgets; [`ScriptedPrompter`]
//! replays prepared answers for non-terminal use and tests.

use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Blocking operator prompts used by the workflows.
pub trait Prompter {
    /// Single choice from `items`; returns the chosen index.
    ///
    /// # Errors
    /// Returns [`Error::Aborted`] if the operator backs out, or
    /// [`Error::Prompt`] if the terminal cannot be used.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize>;

    /// Free text input.
    ///
    /// # Errors
    /// Returns [`Error::Prompt`] if the terminal cannot be used.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question with a default answer.
    ///
    /// # Errors
    /// Returns [`Error::Aborted`] if the operator backs out, or
    /// [`Error::Prompt`] if the terminal cannot be used.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// One prepared answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Pick the item with this exact text.
    Choose(String),
    /// Type this text.
    Text(String),
    /// Answer a yes/no question.
    Confirm(bool),
    /// Accept the default of a yes/no question.
    Default,
}

/// Prompter that replays a fixed list of answers and records each prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter answering with `answers` in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no scripted answer for '{prompt}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Choose(choice) => items
                .iter()
                .position(|item| *item == choice)
                .ok_or_else(|| Error::prompt(format!("'{choice}' is not offered by '{prompt}'"))),
            other => Err(Error::prompt(format!(
                "expected a choice for '{prompt}', got {other:?}"
            ))),
        }
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            other => Err(Error::prompt(format!(
                "expected text for '{prompt}', got {other:?}"
            ))),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(answer) => Ok(answer),
            Answer::Default => Ok(default),
            other => Err(Error::prompt(format!(
                "expected yes/no for '{prompt}', got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_by_text() {
        let mut prompter = ScriptedPrompter::new([Answer::Choose("ca".to_string())]);
        let items = vec!["us".to_string(), "ca".to_string(), "uk".to_string()];
        assert_eq!(prompter.select("Select Region", &items).unwrap(), 1);
        assert_eq!(prompter.asked(), ["Select Region"]);
    }

    #[test]
    fn test_choice_not_offered() {
        let mut prompter = ScriptedPrompter::new([Answer::Choose("eu".to_string())]);
        let err = prompter.select("Select Region", &["us".to_string()]).unwrap_err();
        assert!(err.to_string().contains("not offered"));
    }

    #[test]
    fn test_default_confirmation() {
        let mut prompter = ScriptedPrompter::new([Answer::Default, Answer::Confirm(true)]);
        assert!(!prompter.confirm("Proceed?", false).unwrap());
        assert!(prompter.confirm("Proceed?", false).unwrap());
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_exhausted_script() {
        let mut prompter = ScriptedPrompter::default();
        assert!(matches!(prompter.input("File?"), Err(Error::Prompt { .. })));
    }
}
