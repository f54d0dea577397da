// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keeper register`, `keeper login`, `keeper logout`.

use keeper_client::UserService;
use keeper_core::{AccountCredentials, KeeperError};
use secrecy::ExposeSecret;

use crate::output::Printer;
use crate::prompt::{Prompt, or_ask};

fn account(
    login: Option<String>,
    prompt: &mut dyn Prompt,
    confirm: bool,
) -> Result<AccountCredentials, KeeperError> {
    let login = or_ask(login, prompt, "Login")?;
    if login.trim().is_empty() {
        return Err(KeeperError::InvalidInput("login must not be empty".into()));
    }

    let password = prompt.ask_hidden("Password")?;
    if password.expose_secret().is_empty() {
        return Err(KeeperError::InvalidInput("password must not be empty".into()));
    }
    if confirm {
        let again = prompt.ask_hidden("Repeat password")?;
        if again.expose_secret() != password.expose_secret() {
            return Err(KeeperError::InvalidInput("passwords do not match".into()));
        }
    }
    Ok(AccountCredentials::new(login, password))
}

pub async fn register(
    users: &UserService,
    login: Option<String>,
    printer: Printer,
    prompt: &mut dyn Prompt,
) -> Result<String, KeeperError> {
    let account = account(login, prompt, true)?;
    users.register(&account).await?;
    Ok(printer.success(&format!(
        "registered {} (run `keeper login` to start a session)",
        account.login
    )))
}

pub async fn login(
    users: &UserService,
    login: Option<String>,
    printer: Printer,
    prompt: &mut dyn Prompt,
) -> Result<String, KeeperError> {
    let account = account(login, prompt, false)?;
    users.login(&account).await?;
    Ok(printer.success(&format!("logged in as {}", account.login)))
}

pub fn logout(users: &UserService, printer: Printer) -> Result<String, KeeperError> {
    users.logout()?;
    Ok(printer.success("logged out"))
}
