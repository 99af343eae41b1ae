use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use filecrypt_rs::config::{APP_NAME, PASSWORD_MIN_LENGTH};
use filecrypt_rs::file::File;
use filecrypt_rs::types::{Processing, ProcessorMode};
use filecrypt_rs::{DecryptionResult, Hooks, OsRandom, Password, Processor};
use tracing::{Level, warn};

use crate::ui::display::{show_failure, show_success};
use crate::ui::progress::Bar;
use crate::ui::prompt::Prompt;

#[derive(Args)]
pub struct Target {
    #[arg(short, long)]
    input: PathBuf,

    /// Defaults to the input with the .fce extension added (encrypt) or removed (decrypt).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prompted for when omitted.
    #[arg(short, long)]
    password: Option<String>,

    /// Overwrite an existing output file.
    #[arg(short, long)]
    force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Encrypt(Target),
    Decrypt(Target),
}

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Encrypt files with a password using AES-256-CBC and a SHA-256 integrity check.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,

    /// Log engine internals to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();
        let level = if app.verbose { Level::DEBUG } else { Level::WARN };

        let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).with_max_level(level).with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        Ok(app)
    }

    pub fn execute(self) -> Result<ExitCode> {
        let prompt = Prompt::new(PASSWORD_MIN_LENGTH);
        match self.command {
            Commands::Encrypt(target) => Self::run_mode(target, Processing::Encryption, &prompt),
            Commands::Decrypt(target) => Self::run_mode(target, Processing::Decryption, &prompt),
        }
    }

    fn run_mode(target: Target, processing: Processing, prompt: &Prompt) -> Result<ExitCode> {
        let mode = processing.mode();

        let input = File::new(target.input);
        input.validate_input()?;

        let output = File::new(match target.output {
            Some(path) => path,
            None => input.output_path(mode)?,
        });
        let existed = output.exists();
        ensure!(target.force || !existed, "output file already exists: {} (use --force to overwrite)", output.path().display());

        let password = match target.password.map(Password::from_string) {
            Some(password) => password,
            None => Self::get_password(prompt, mode)?,
        };

        let processor = Processor::new(OsRandom::shared());
        let mut bar = Bar::new(input.size()?, &processing.to_string())?;

        let outcome = match mode {
            ProcessorMode::Encrypt => processor.encrypt(input.path(), output.path(), &password, Hooks::default().with_progress(&mut bar)).map(|()| DecryptionResult::Success),
            ProcessorMode::Decrypt => processor.try_decrypt(input.path(), output.path(), &password, Hooks::default().with_progress(&mut bar)),
        };

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                bar.abandon();
                if !existed {
                    Self::discard(&output);
                }
                return Err(err).with_context(|| format!("{} failed: {}", mode, input.path().display()));
            }
        };

        if result.is_success() {
            bar.finish();
            show_success(mode, output.path(), output.size()?);
            return Ok(ExitCode::SUCCESS);
        }

        bar.abandon();

        // A corrupted verdict is reached before the output is opened.
        let touched = result != DecryptionResult::FailedFileCorrupted && output.exists();
        let discarded = touched && Self::discard(&output);
        show_failure(result, discarded.then_some(output.path()));

        Ok(ExitCode::from(result.code()))
    }

    fn discard(output: &File) -> bool {
        if !output.exists() {
            return false;
        }

        match output.delete() {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %output.path().display(), error = %err, "failed to remove partial output");
                false
            }
        }
    }

    fn get_password(prompt: &Prompt, mode: ProcessorMode) -> Result<Password> {
        match mode {
            ProcessorMode::Encrypt => prompt.prompt_encryption_password(),
            ProcessorMode::Decrypt => prompt.prompt_decryption_password(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_decrypt() {
        let app = App::try_parse_from(["filecrypt-rs", "decrypt", "-i", "a.txt.fce", "-p", "pw", "--force"]).unwrap();
        let Commands::Decrypt(target) = app.command else {
            panic!("expected decrypt");
        };
        assert_eq!(target.input, PathBuf::from("a.txt.fce"));
        assert!(target.output.is_none());
        assert_eq!(target.password.as_deref(), Some("pw"));
        assert!(target.force);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(App::try_parse_from(["filecrypt-rs"]).is_err());
    }
}
