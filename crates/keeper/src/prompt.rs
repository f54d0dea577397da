// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive input: visible prompts, masked prompts, and the master password.
//!
//! On a terminal, masked values are read with `rpassword`. When stdin is a
//! pipe every value, masked or not, is read as one line from stdin so the CLI
//! can be scripted.

use std::io::{BufRead, IsTerminal, Write};

use keeper_core::KeeperError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the master password for headless use.
pub const MASTER_PASSWORD_ENV_VAR: &str = "KEEPER_MASTER_PASSWORD";

/// Source of user-typed values.
pub trait Prompt {
    /// Read a visible line, without the trailing newline.
    fn ask(&mut self, label: &str) -> Result<String, KeeperError>;

    /// Read a value without echoing it.
    fn ask_hidden(&mut self, label: &str) -> Result<SecretString, KeeperError>;
}

/// Prompts on stderr, reads from the terminal or from piped stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

fn input_error(e: std::io::Error) -> KeeperError {
    KeeperError::Internal(format!("failed to read input: {e}"))
}

fn read_stdin_line() -> Result<String, KeeperError> {
    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(input_error)?;
    if read == 0 {
        return Err(KeeperError::Internal(
            "unexpected end of input".to_string(),
        ));
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str) -> Result<String, KeeperError> {
        eprint!("{label}: ");
        std::io::stderr().flush().map_err(input_error)?;
        read_stdin_line()
    }

    fn ask_hidden(&mut self, label: &str) -> Result<SecretString, KeeperError> {
        if std::io::stdin().is_terminal() {
            let value = rpassword::prompt_password(format!("{label}: ")).map_err(input_error)?;
            Ok(SecretString::from(value))
        } else {
            read_stdin_line().map(SecretString::from)
        }
    }
}

/// Master password from [`MASTER_PASSWORD_ENV_VAR`] or a masked prompt.
///
/// An empty password is rejected: it would silently protect every secret
/// with nothing but the salt.
pub fn master_password(prompt: &mut dyn Prompt) -> Result<SecretString, KeeperError> {
    if let Ok(value) = std::env::var(MASTER_PASSWORD_ENV_VAR)
        && !value.is_empty()
    {
        return Ok(SecretString::from(value));
    }

    let password = prompt.ask_hidden("Master password")?;
    if password.expose_secret().is_empty() {
        return Err(KeeperError::InvalidInput(format!(
            "empty master password (type one or set {MASTER_PASSWORD_ENV_VAR})"
        )));
    }
    Ok(password)
}

/// `value` if given on the command line, else prompt for it.
pub fn or_ask(
    value: Option<String>,
    prompt: &mut dyn Prompt,
    label: &str,
) -> Result<String, KeeperError> {
    match value {
        Some(value) => Ok(value),
        None => prompt.ask(label),
    }
}
