use std::path::PathBuf;

use anyhow::Result;
use chrono::{offset::Utc, DateTime, NaiveDate};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use banksync::prelude::*;

pub mod account;
pub mod bank;
pub mod category;
pub mod group;
pub mod name;
pub mod provider;
pub mod server;
pub mod transactions;

/// Bank data synchronization control
#[derive(Default, Clone, Debug, Parser)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Sets a custom config directory
    ///
    /// The default value is $BANKSYNC_CONFIG if it is set, or
    /// $XDG_CONFIG_HOME/banksync otherwise
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub config: Option<PathBuf>,

    /// Sets a custom data directory
    ///
    /// The default value is $BANKSYNC_DATA if it is set, or
    /// $XDG_DATA_HOME/banksync otherwise
    #[arg(
        short = 'D',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Bank related commands
    Bank {
        #[command(subcommand)]
        command: bank::Command,
    },
    /// Account related commands
    Account {
        #[command(subcommand)]
        command: account::Command,
    },
    /// Category related commands
    Category {
        #[command(subcommand)]
        command: category::Command,
    },
    /// Category group related commands
    Group {
        #[command(subcommand)]
        command: group::Command,
    },
    /// Counterparty display name mappings
    Name {
        #[command(subcommand)]
        command: name::Command,
    },
    /// Transaction related commands
    Transactions {
        #[command(subcommand)]
        command: transactions::Command,
    },
    /// Provider specific settings
    Provider {
        #[command(subcommand)]
        command: provider::Command,
    },
    /// Serve the JSON API
    Server(server::Server),
    /// Reset the database
    #[command(hide = true)]
    Reset {
        #[arg(long, required = true)]
        confirm: bool,
    },
}

/// Either the uuid or the name of an object
#[derive(Clone, Debug, PartialEq)]
pub enum Identifier {
    Uuid(Uuid),
    Name(String),
}

impl std::str::FromStr for Identifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match Uuid::parse_str(s) {
            Ok(uuid) => Self::Uuid(uuid),
            Err(_) => Self::Name(s.to_string()),
        })
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uuid(uuid) => write!(f, "{uuid}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl Identifier {
    pub fn account(&self, conn: &mut Conn) -> Result<Account> {
        Ok(match self {
            Self::Uuid(uuid) => Account::find_by_uuid(conn, *uuid)?,
            Self::Name(name) => Account::find_by_name(conn, name)?,
        })
    }

    pub fn category(&self, conn: &mut Conn) -> Result<Category> {
        Ok(match self {
            Self::Uuid(uuid) => Category::find_by_uuid(conn, *uuid)?,
            Self::Name(name) => Category::find_by_name(conn, name)?,
        })
    }
}

/// Wrap a filter in `%` for a LIKE query, unless it already contains some
pub fn like_pattern(filter: &Option<String>) -> Option<String> {
    filter.as_ref().map(|n| {
        let mut n = n.clone();
        if !n.starts_with('%') {
            n = format!("%{n}");
        }
        if !n.ends_with('%') {
            n.push('%');
        }
        n
    })
}

/// Start of the given day, in UTC
pub fn date_to_utc(date: Option<NaiveDate>) -> Result<Option<DateTime<Utc>>> {
    date.map(crate::utils::naive_date_to_utc).transpose()
}
