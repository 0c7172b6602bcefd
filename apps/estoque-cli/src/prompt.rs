//! Terminal interaction.
//!
//! Flows talk to a [`Prompt`] rather than to dialoguer directly, so the login
//! and menu flows can be driven from tests with scripted answers.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use crate::error::AppResult;

/// A source of answers and a sink for messages.
pub trait Prompt {
    /// Free-form text. An empty answer is allowed.
    fn input(&mut self, label: &str) -> AppResult<String>;

    /// Hidden text.
    fn password(&mut self, label: &str) -> AppResult<String>;

    /// Yes/no question, defaulting to no.
    fn confirm(&mut self, label: &str) -> AppResult<bool>;

    /// Pick one of `items`. `None` when the user backs out.
    fn select(&mut self, label: &str, items: &[String]) -> AppResult<Option<usize>>;

    /// Prints a message.
    fn show(&mut self, message: &str);
}

/// dialoguer-backed prompt on the controlling terminal.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn input(&mut self, label: &str) -> AppResult<String> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn password(&mut self, label: &str) -> AppResult<String> {
        let value = Password::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()?;
        Ok(value)
    }

    fn confirm(&mut self, label: &str) -> AppResult<bool> {
        let value = Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(false)
            .interact()?;
        Ok(value)
    }

    fn select(&mut self, label: &str, items: &[String]) -> AppResult<Option<usize>> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }

    fn show(&mut self, message: &str) {
        println!("{}", message);
    }
}
