use dialoguer::{Confirm, Input};

use crate::error::{BillingError, Result};

/// Environment boundary for the interactive dialogs, so the pipeline can be
/// driven by deterministic stand-ins in tests and by `--yes` in scripts.
pub trait Prompter {
    fn choose_input_file(&self) -> Result<String>;
    fn choose_output_file(&self) -> Result<String>;
    /// Ask the operator whether to keep going. `false` aborts the run.
    fn confirm_continue(&self, message: &str) -> Result<bool>;
}

/// Terminal prompts via dialoguer. An empty answer means the operator
/// declined to pick a file.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn choose_input_file(&self) -> Result<String> {
        ask_path("Input CSV path").ok_or(BillingError::NoInputSelected)
    }

    fn choose_output_file(&self) -> Result<String> {
        ask_path("Output CSV path").ok_or(BillingError::NoOutputSelected)
    }

    fn confirm_continue(&self, message: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(message)
            .default(true)
            .interact()
            .unwrap_or(false);
        Ok(confirmed)
    }
}

fn ask_path(prompt: &str) -> Option<String> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();
    let path = path.trim();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Never prompts: file paths must come from the command line, and
/// cost-center anomalies are acknowledged automatically (`--yes`).
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn choose_input_file(&self) -> Result<String> {
        Err(BillingError::NoInputSelected)
    }

    fn choose_output_file(&self) -> Result<String> {
        Err(BillingError::NoOutputSelected)
    }

    fn confirm_continue(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}
