//! Masked password prompts.

use anyhow::{Context, Result};
use filecrypt_rs::Password;
use inquire::validator::Validation;
use inquire::{PasswordDisplayMode, min_length, required};

/// Password prompt handler.
pub struct Prompt {
    password_min_length: usize,
}

impl Prompt {
    pub fn new(password_min_length: usize) -> Self {
        Self { password_min_length }
    }

    /// Asks for a new password twice. Enforces the minimum length.
    pub fn prompt_encryption_password(&self) -> Result<Password> {
        let message = format!("password must be at least {} characters long", self.password_min_length);

        let password = inquire::Password::new("Enter encryption password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(Validation::Invalid("password cannot be empty or whitespace only".into()))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .with_validator(min_length!(self.password_min_length, message))
            .with_custom_confirmation_message("Confirm password:")
            .with_custom_confirmation_error_message("passwords do not match")
            .prompt()
            .context("password input failed")?;

        Ok(Password::from_string(password))
    }

    /// Asks for an existing password once. Any non-empty input is accepted,
    /// a wrong one is caught when the container is opened.
    pub fn prompt_decryption_password(&self) -> Result<Password> {
        let password = inquire::Password::new("Enter decryption password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_validator(required!("password cannot be empty"))
            .without_confirmation()
            .prompt()
            .context("password input failed")?;

        Ok(Password::from_string(password))
    }
}
