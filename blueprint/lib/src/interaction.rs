//! Terminal interaction seam.
//!
//! The wizard and the revision loop only talk to the user through
//! [`Prompter`], which keeps them independent of the terminal.
//! [`InquirePrompter`] is the real implementation.

use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::error::BlueprintError;

/// Line-oriented user interaction.
pub trait Prompter {
    /// Asks for a line of free text.
    ///
    /// ## Errors
    ///
    /// Returns `BlueprintError::Interaction` when the prompt is aborted.
    fn text(&mut self, message: &str, help: Option<&str>) -> Result<String, BlueprintError>;

    /// Asks for a secret; input is masked.
    ///
    /// ## Errors
    ///
    /// Returns `BlueprintError::Interaction` when the prompt is aborted.
    fn secret(&mut self, message: &str) -> Result<String, BlueprintError>;

    /// Asks the user to pick one of `options`, returning its index.
    ///
    /// ## Errors
    ///
    /// Returns `BlueprintError::Interaction` when the prompt is aborted.
    fn select(&mut self, message: &str, options: &[String]) -> Result<usize, BlueprintError>;

    /// Displays output to the user.
    fn show(&mut self, text: &str);
}

/// [`Prompter`] backed by `inquire` on the controlling terminal.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

fn interaction_error(err: InquireError) -> BlueprintError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            BlueprintError::Interaction("cancelled by user".to_string())
        }
        other => BlueprintError::Interaction(other.to_string()),
    }
}

impl Prompter for InquirePrompter {
    fn text(&mut self, message: &str, help: Option<&str>) -> Result<String, BlueprintError> {
        let mut prompt = Text::new(message);
        if let Some(help) = help {
            prompt = prompt.with_help_message(help);
        }
        prompt.prompt().map_err(interaction_error)
    }

    fn secret(&mut self, message: &str) -> Result<String, BlueprintError> {
        Password::new(message)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .map_err(interaction_error)
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<usize, BlueprintError> {
        Select::new(message, options.to_vec())
            .with_help_message("↑↓ to move, enter to select")
            .raw_prompt()
            .map(|choice| choice.index)
            .map_err(interaction_error)
    }

    fn show(&mut self, text: &str) {
        println!("{text}");
    }
}
