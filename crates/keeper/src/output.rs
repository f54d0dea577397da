// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of secrets and command results.

use std::fmt::Write as _;
use std::path::Path;

use keeper_core::{BankCard, SecretMeta, SecretPayload, SecretResponse};

/// Renders results, with colors only when stdout is a terminal and `--plain`
/// was not given.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(plain: bool) -> Self {
        use std::io::IsTerminal;
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn success(&self, message: &str) -> String {
        if self.color {
            use colored::Colorize;
            format!("{} {message}", "✓".green())
        } else {
            format!("[OK] {message}")
        }
    }

    pub fn error(&self, message: &str) -> String {
        if self.color {
            use colored::Colorize;
            format!("{} {}", "error:".red().bold(), message)
        } else {
            format!("error: {message}")
        }
    }

    fn label(&self, name: &str) -> String {
        let padded = format!("{name:<10}");
        if self.color {
            use colored::Colorize;
            padded.dimmed().to_string()
        } else {
            padded
        }
    }

    /// Summary printed after add/update/delete. The `ID:` line is stable for
    /// scripts.
    pub fn meta(&self, action: &str, meta: &SecretMeta) -> String {
        let mut out = self.success(&format!("{action} {} secret \"{}\"", meta.kind, meta.name));
        let _ = write!(out, "\nID: {}", meta.id);
        out
    }

    /// Full decrypted secret.
    ///
    /// Binary payloads are not rendered; `saved_to` names the file their
    /// bytes were written to.
    pub fn secret(&self, response: &SecretResponse, payload: &SecretPayload, saved_to: Option<&Path>) -> String {
        let mut rows: Vec<(&str, String)> = vec![
            ("ID", response.id.to_string()),
            ("Name", response.name.clone()),
            ("Type", response.kind.to_string()),
        ];
        if !response.note.is_empty() {
            rows.push(("Note", response.note.clone()));
        }

        match payload {
            SecretPayload::Credentials(c) => {
                rows.push(("Login", c.login.clone()));
                rows.push(("Password", c.password.clone()));
            }
            SecretPayload::Text(t) => rows.push(("Content", t.content.clone())),
            SecretPayload::Binary(b) => {
                rows.push(("File", b.filename.clone()));
                rows.push(("Size", format!("{} bytes", b.data.len())));
                if let Some(path) = saved_to {
                    rows.push(("Saved to", path.display().to_string()));
                }
            }
            SecretPayload::Card(card) => card_rows(card, &mut rows),
        }

        if let Some(updated) = response.updated_at {
            rows.push(("Updated", updated.to_rfc3339()));
        }

        rows.iter()
            .map(|(name, value)| format!("{} {value}", self.label(&format!("{name}:"))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn card_rows(card: &BankCard, rows: &mut Vec<(&str, String)>) {
    rows.push(("Number", card.number.clone()));
    rows.push(("Expires", format!("{}/{}", card.exp_month, card.exp_year)));
    rows.push(("Holder", card.holder_name.clone()));
    rows.push(("CVV", card.cvv.clone()));
    for (name, value) in [
        ("Billing", &card.billing_address),
        ("Card type", &card.card_type),
        ("Bank", &card.issuing_bank),
    ] {
        if !value.is_empty() {
            rows.push((name, value.clone()));
        }
    }
}

/// Machine-readable form of a decrypted secret for `--json`.
pub fn secret_json(response: &SecretResponse, payload: &SecretPayload) -> serde_json::Value {
    let data = match payload {
        SecretPayload::Credentials(c) => serde_json::to_value(c),
        SecretPayload::Text(t) => serde_json::to_value(t),
        SecretPayload::Binary(b) => serde_json::to_value(b),
        SecretPayload::Card(c) => serde_json::to_value(c),
    }
    .unwrap_or(serde_json::Value::Null);

    serde_json::json!({
        "id": response.id,
        "name": response.name,
        "type": response.kind.to_string(),
        "note": response.note,
        "data": data,
        "createdAt": response.created_at,
        "updatedAt": response.updated_at,
    })
}
