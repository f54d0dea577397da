// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeper - a password manager client with client-side encryption.
//!
//! This is the binary entry point. Secrets are encrypted under the master
//! password before they leave the process; the server stores envelopes only.

mod output;
mod prompt;
mod secret;
mod user;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use keeper_client::{FileTokenStore, HttpApiClient, SecretService, UserService};
use keeper_config::KeeperConfig;
use keeper_core::KeeperError;
use keeper_crypto::PasswordCodec;
use tokio_util::sync::CancellationToken;

use crate::output::Printer;
use crate::prompt::TerminalPrompt;
use crate::secret::SecretCommand;

/// Keeper - a password manager client with client-side encryption.
#[derive(Parser, Debug)]
#[command(name = "keeper", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account on the server.
    Register {
        #[arg(short, long)]
        login: Option<String>,
    },
    /// Log in and store the session token.
    Login {
        #[arg(short, long)]
        login: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Manage secrets.
    #[command(subcommand)]
    Secret(SecretCommand),
    /// Print build information.
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let printer = Printer::new(cli.plain);

    if let Commands::Version = cli.command {
        println!("{}", build_info());
        return;
    }

    let loaded = match &cli.config {
        Some(path) => keeper_config::load_and_validate_path(path),
        None => keeper_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            keeper_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match run(cli.command, &config, printer, cancel).await {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(err) => {
            eprintln!("{}", printer.error(&err.to_string()));
            if let Some(hint) = hint(&err) {
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}

async fn run(
    command: Commands,
    config: &KeeperConfig,
    printer: Printer,
    cancel: CancellationToken,
) -> Result<String, KeeperError> {
    let api = Arc::new(HttpApiClient::new(&config.server)?);
    let tokens = Arc::new(FileTokenStore::from_config(&config.session));
    let timeout = config.server.request_timeout();
    let mut prompt = TerminalPrompt;

    tracing::debug!(
        server = api.base_url(),
        token_path = %tokens.path().display(),
        "client ready"
    );

    let users = || {
        UserService::new(api.clone(), tokens.clone())
            .with_timeout(timeout)
            .with_cancellation(cancel.clone())
    };

    match command {
        Commands::Register { login } => user::register(&users(), login, printer, &mut prompt).await,
        Commands::Login { login } => user::login(&users(), login, printer, &mut prompt).await,
        Commands::Logout => user::logout(&users(), printer),
        Commands::Secret(command) => {
            let codec = PasswordCodec::with_iterations(config.crypto.kdf_iterations)?;
            let secrets = SecretService::new(api.clone(), tokens.clone(), codec)
                .with_timeout(timeout)
                .with_cancellation(cancel.clone());
            secret::run(command, &secrets, printer, &mut prompt).await
        }
        Commands::Version => Ok(build_info()),
    }
}

fn hint(err: &KeeperError) -> Option<&'static str> {
    match err {
        KeeperError::Transport { .. } | KeeperError::Timeout { .. } => {
            Some("hint: check `server.address` in keeper.toml and that the server is running")
        }
        _ => None,
    }
}

fn build_info() -> String {
    format!(
        "Build version: {}\nBuild date: {}\nBuild commit: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("KEEPER_BUILD_DATE").unwrap_or("N/A"),
        option_env!("KEEPER_BUILD_COMMIT").unwrap_or("N/A"),
    )
}

/// Initialize tracing on stderr so stdout stays clean for command output.
///
/// `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keeper={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
