//! Service configuration
//!
//! Flags fall back to environment variables (`.env` is loaded first by the
//! binary), so the same knobs work on the command line and in deployments.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(name = "atm")]
#[command(about = "ATM HTTP service - login, view balance, deposit and withdraw")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "ATM_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Seed accounts as comma-separated `username:pin` pairs
    #[arg(long, env = "ATM_ACCOUNTS", default_value = "bchan:1234")]
    pub accounts: String,

    /// TOML file with extra `[[accounts]]` entries (overrides --accounts)
    #[arg(long, env = "ATM_ACCOUNTS_FILE")]
    pub accounts_file: Option<PathBuf>,

    /// Route POST /logout so sessions can be closed
    #[arg(long, env = "ATM_ENABLE_LOGOUT", default_value_t = false)]
    pub enable_logout: bool,
}

/// Resolved configuration the server is built from.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    /// username -> pin
    pub accounts: HashMap<String, i64>,
    pub enable_logout: bool,
}

#[derive(Debug, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    username: String,
    pin: i64,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let mut accounts = parse_accounts(&args.accounts)?;

        if let Some(path) = &args.accounts_file {
            let from_file = load_accounts_file(path)?;
            info!(
                "📇 Loaded {} account(s) from {}",
                from_file.len(),
                path.display()
            );
            accounts.extend(from_file);
        }

        if accounts.is_empty() {
            bail!("No accounts configured; set --accounts or --accounts-file");
        }

        Ok(Self {
            bind: args.bind,
            accounts,
            enable_logout: args.enable_logout,
        })
    }
}

/// Parse `alice:1234,bob:4321`. Blank entries are skipped.
pub fn parse_accounts(raw: &str) -> Result<HashMap<String, i64>> {
    let mut accounts = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, pin) = entry
            .split_once(':')
            .with_context(|| format!("Account entry '{}' must be username:pin", entry))?;
        let username = username.trim();
        if username.is_empty() {
            bail!("Account entry '{}' has an empty username", entry);
        }
        let pin = pin
            .trim()
            .parse::<i64>()
            .with_context(|| format!("Invalid PIN for account '{}'", username))?;
        accounts.insert(username.to_string(), pin);
    }

    Ok(accounts)
}

fn load_accounts_file(path: &Path) -> Result<HashMap<String, i64>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read accounts file {}", path.display()))?;
    let file: AccountsFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse accounts file {}", path.display()))?;

    Ok(file
        .accounts
        .into_iter()
        .map(|a| (a.username, a.pin))
        .collect())
}
