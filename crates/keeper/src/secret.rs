// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keeper secret ...` subcommands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use keeper_client::SecretService;
use keeper_core::{
    BankCard, BinaryData, Credentials, KeeperError, SecretDraft, SecretId, SecretPayload,
    TextData,
};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::output::{Printer, secret_json};
use crate::prompt::{Prompt, master_password, or_ask};

#[derive(Subcommand, Debug)]
pub enum SecretCommand {
    /// Encrypt and store a new secret.
    #[command(subcommand)]
    Add(SecretInput),
    /// Fetch and decrypt a secret.
    Get {
        id: SecretId,
        /// Print the secret as JSON.
        #[arg(long)]
        json: bool,
        /// Where to write a binary secret (defaults to its stored file name).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Replace a secret with new content.
    Update {
        id: SecretId,
        #[command(subcommand)]
        input: SecretInput,
    },
    /// Delete a secret.
    Delete { id: SecretId },
}

/// Name and note shared by every kind.
#[derive(Args, Debug, Default)]
pub struct Labels {
    /// Secret name.
    #[arg(short, long)]
    name: Option<String>,
    /// Free-form note, stored unencrypted.
    #[arg(short = 'e', long)]
    note: Option<String>,
}

/// Secret content. Anything not given as a flag is prompted for; passwords
/// and CVV codes are only ever prompted for.
#[derive(Subcommand, Debug)]
pub enum SecretInput {
    /// Login/password pair.
    Credentials {
        #[command(flatten)]
        labels: Labels,
        #[arg(short, long)]
        login: Option<String>,
    },
    /// Free-form text.
    Text {
        #[command(flatten)]
        labels: Labels,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// A file.
    Binary {
        #[command(flatten)]
        labels: Labels,
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Payment card.
    Card {
        #[command(flatten)]
        labels: Labels,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        exp_month: Option<String>,
        #[arg(long)]
        exp_year: Option<String>,
        #[arg(long)]
        holder: Option<String>,
        #[arg(long)]
        billing_address: Option<String>,
        #[arg(long)]
        card_type: Option<String>,
        #[arg(long)]
        bank: Option<String>,
    },
}

fn labels(labels: Labels, prompt: &mut dyn Prompt) -> Result<(String, String), KeeperError> {
    let name = or_ask(labels.name, prompt, "Name")?;
    if name.trim().is_empty() {
        return Err(KeeperError::InvalidInput("secret name must not be empty".into()));
    }
    let note = or_ask(labels.note, prompt, "Note")?;
    Ok((name, note))
}

fn check_expiry(month: &str, year: &str) -> Result<(), KeeperError> {
    let month_ok = month.len() <= 2 && matches!(month.parse::<u8>(), Ok(1..=12));
    if !month_ok {
        return Err(KeeperError::InvalidInput(format!(
            "invalid expiration month `{month}` (expected 01-12)"
        )));
    }
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(KeeperError::InvalidInput(format!(
            "invalid expiration year `{year}` (expected four digits)"
        )));
    }
    Ok(())
}

/// Collect a draft from flags, falling back to prompts.
pub fn build_draft(input: SecretInput, prompt: &mut dyn Prompt) -> Result<SecretDraft, KeeperError> {
    let draft = match input {
        SecretInput::Credentials { labels: l, login } => {
            let (name, note) = labels(l, prompt)?;
            let login = or_ask(login, prompt, "Login")?;
            let password = prompt.ask_hidden("Password")?;
            SecretDraft::new(
                name,
                note,
                SecretPayload::Credentials(Credentials {
                    login,
                    password: password.expose_secret().to_string(),
                }),
            )
        }
        SecretInput::Text { labels: l, content } => {
            let (name, note) = labels(l, prompt)?;
            let content = or_ask(content, prompt, "Content")?;
            SecretDraft::new(name, note, SecretPayload::Text(TextData { content }))
        }
        SecretInput::Binary { labels: l, file } => {
            let (name, note) = labels(l, prompt)?;
            let path = match file {
                Some(path) => path,
                None => PathBuf::from(prompt.ask("File")?),
            };
            SecretDraft::new(name, note, SecretPayload::Binary(read_file(&path)?))
        }
        SecretInput::Card {
            labels: l,
            number,
            exp_month,
            exp_year,
            holder,
            billing_address,
            card_type,
            bank,
        } => {
            let (name, note) = labels(l, prompt)?;
            let mut card = BankCard::default();
            card.number = or_ask(number, prompt, "Card number")?;
            card.exp_month = or_ask(exp_month, prompt, "Expiration month")?;
            card.exp_year = or_ask(exp_year, prompt, "Expiration year")?;
            check_expiry(&card.exp_month, &card.exp_year)?;
            card.holder_name = or_ask(holder, prompt, "Card holder")?;
            card.cvv = prompt.ask_hidden("CVV")?.expose_secret().to_string();
            card.billing_address = or_ask(billing_address, prompt, "Billing address")?;
            card.card_type = or_ask(card_type, prompt, "Card type")?;
            card.issuing_bank = or_ask(bank, prompt, "Issuing bank")?;
            SecretDraft::new(name, note, SecretPayload::Card(card))
        }
    };
    Ok(draft)
}

fn read_file(path: &Path) -> Result<BinaryData, KeeperError> {
    let data = std::fs::read(path)
        .map_err(|e| KeeperError::Internal(format!("failed to read {}: {e}", path.display())))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| KeeperError::InvalidInput(format!("{} is not a file", path.display())))?;
    Ok(BinaryData { filename, data })
}

/// Write decrypted bytes readable by the owner only. Refuses to replace an
/// existing file unless `force` is set.
fn write_private(path: &Path, data: &[u8], force: bool) -> Result<(), KeeperError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => KeeperError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )),
        _ => KeeperError::Internal(format!("failed to create {}: {e}", path.display())),
    })?;
    file.write_all(data)
        .map_err(|e| KeeperError::Internal(format!("failed to write {}: {e}", path.display())))
}

/// Default output path for a binary secret: its stored file name, stripped
/// of any directory part, in the current directory.
fn default_output(filename: &str) -> Result<PathBuf, KeeperError> {
    Path::new(filename)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| {
            KeeperError::InvalidInput(format!(
                "stored file name `{filename}` is unusable, pass --output"
            ))
        })
}

/// Run a secret subcommand and return what to print on stdout.
pub async fn run(
    command: SecretCommand,
    secrets: &SecretService,
    printer: Printer,
    prompt: &mut dyn Prompt,
) -> Result<String, KeeperError> {
    match command {
        SecretCommand::Add(input) => {
            let draft = build_draft(input, prompt)?;
            let master = master_password(prompt)?;
            let meta = secrets.add(&draft, &master).await?;
            Ok(printer.meta("added", &meta))
        }
        SecretCommand::Get {
            id,
            json,
            output,
            force,
        } => {
            let master = master_password(prompt)?;
            let response = secrets.get_secret(id, &master).await?;
            let payload = response.payload()?;

            if json {
                return serde_json::to_string_pretty(&secret_json(&response, &payload))
                    .map_err(KeeperError::from);
            }

            let saved_to = match &payload {
                SecretPayload::Binary(file) => {
                    let path = match output {
                        Some(path) => path,
                        None => default_output(&file.filename)?,
                    };
                    write_private(&path, &file.data, force)?;
                    debug!(path = %path.display(), size = file.data.len(), "binary secret written");
                    Some(path)
                }
                _ => None,
            };
            Ok(printer.secret(&response, &payload, saved_to.as_deref()))
        }
        SecretCommand::Update { id, input } => {
            let draft = build_draft(input, prompt)?;
            let master = master_password(prompt)?;
            let meta = secrets.update_secret(id, &draft, &master).await?;
            Ok(printer.meta("updated", &meta))
        }
        SecretCommand::Delete { id } => match secrets.delete_secret(id).await? {
            Some(meta) => Ok(printer.meta("deleted", &meta)),
            None => Ok(printer.success(&format!("deleted secret {id}"))),
        },
    }
}
