use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use toml::{Table, Value};

use banksync::{
    prelude::*,
    provider::{DefaultCategories, ProviderKind, StarlingProvider},
    sync::DEFAULT_INTERVAL_DAYS,
};

use crate::cli::{Cli, Commands};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

#[derive(Debug)]
pub struct Config {
    pub dir: PathBuf,
    pub data_dir: PathBuf,
    cli: Cli,
    table: Table,
}

/// A `[banks."<name>"]` table of the configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BankConfig {
    #[serde(skip)]
    pub name: String,
    pub provider: ProviderKind,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl BankConfig {
    pub fn token(&self) -> Result<String> {
        match (&self.token, &self.token_file) {
            (Some(token), _) => Ok(token.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)
                .with_context(|| format!("Reading token of bank {}", self.name))?
                .trim()
                .to_string()),
            (None, None) => Err(anyhow!("No token or token_file for bank {}", self.name)),
        }
    }
}

impl Config {
    pub fn try_parse() -> Result<Self> {
        Self::try_parse_from(std::env::args_os())
    }

    pub fn try_parse_from<I, T>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;

        let cli = Cli::try_parse_from(iter)?;

        let dir = match cli.config.clone() {
            Some(dir) => dir,
            None => config_home()?,
        };
        let table = match std::fs::read_to_string(dir.join("config.toml")) {
            Ok(content) => content.parse::<Table>()?,
            Err(_) => Table::new(),
        };

        let data_dir = match cli.data.clone() {
            Some(dir) => dir,
            None => match table.get("data_dir").and_then(Value::as_str) {
                Some(dir) => PathBuf::from(dir),
                None => data_home()?,
            },
        };

        if !data_dir.is_dir() {
            return Err(anyhow!(
                "Data directory is not a dir: {}",
                data_dir.display()
            ));
        }

        Ok(Config {
            dir,
            data_dir,
            cli,
            table,
        })
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.cli.verbose.log_level_filter()
    }

    pub fn command(&self) -> Option<&Commands> {
        self.cli.command.as_ref()
    }

    pub fn database_path(&self) -> PathBuf {
        let db_filename = self
            .table
            .get("db")
            .and_then(Value::as_table)
            .and_then(|db| db.get("filename"))
            .and_then(Value::as_str)
            .unwrap_or("db.banksync");

        self.data_dir.join(db_filename)
    }

    pub fn database(&self) -> Result<Conn> {
        let mut db = Database::open(self.database_path())?;
        db.setup()?;
        Ok(db.into())
    }

    pub fn default_interval_days(&self) -> Result<i64> {
        match self.table.get("default_interval_days") {
            None => Ok(DEFAULT_INTERVAL_DAYS),
            Some(Value::Integer(days)) if *days > 0 => Ok(*days),
            Some(value) => Err(anyhow!("Invalid default_interval_days: {value}")),
        }
    }

    pub fn server_address(&self) -> Result<SocketAddr> {
        let address = self
            .table
            .get("server")
            .and_then(Value::as_table)
            .and_then(|server| server.get("address"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SERVER_ADDRESS);

        address
            .parse()
            .with_context(|| format!("Invalid server address: {address}"))
    }

    pub fn banks(&self) -> Result<Vec<BankConfig>> {
        let Some(banks) = self.table.get("banks") else {
            return Ok(Vec::new());
        };
        let banks = banks
            .as_table()
            .ok_or_else(|| anyhow!("banks must be a table of bank names"))?;

        banks
            .iter()
            .map(|(name, value)| {
                let mut bank = value
                    .clone()
                    .try_into::<BankConfig>()
                    .with_context(|| format!("Invalid configuration for bank {name}"))?;
                bank.name = name.clone();
                Ok(bank)
            })
            .collect()
    }

    pub fn bank(&self, name: &str) -> Result<BankConfig> {
        self.banks()?
            .into_iter()
            .find(|bank| bank.name == name)
            .ok_or_else(|| anyhow!("Bank {name} is not configured"))
    }

    pub fn default_categories(&self) -> DefaultCategories {
        DefaultCategories::new(self.dir.join("starling_config.toml"))
    }

    pub fn starling(&self, bank: &BankConfig) -> Result<StarlingProvider> {
        Ok(StarlingProvider::new(
            &bank.name,
            &bank.token()?,
            self.default_categories(),
        )?)
    }

    pub fn provider(&self, bank: &BankConfig) -> Result<Box<dyn Provider>> {
        match bank.provider {
            ProviderKind::Starling => Ok(Box::new(self.starling(bank)?)),
        }
    }

    pub fn dispatcher(&self) -> Result<Dispatcher> {
        let providers = self
            .banks()?
            .iter()
            .map(|bank| self.provider(bank))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dispatcher::new(providers).with_default_interval_days(self.default_interval_days()?))
    }
}

fn config_home() -> Result<PathBuf> {
    match std::env::var("BANKSYNC_CONFIG") {
        Ok(val) if !val.is_empty() => Ok(PathBuf::from(val)),
        _ => {
            let path = xdg::BaseDirectories::with_prefix("banksync")?.get_config_home();
            if !path.exists() {
                std::fs::create_dir_all(&path)?;
            }
            Ok(path)
        }
    }
}

fn data_home() -> Result<PathBuf> {
    match std::env::var("BANKSYNC_DATA") {
        Ok(val) if !val.is_empty() => Ok(PathBuf::from(val)),
        _ => {
            let path = xdg::BaseDirectories::with_prefix("banksync")?.get_data_home();
            if !path.exists() {
                std::fs::create_dir_all(&path)?;
            }
            Ok(path)
        }
    }
}
