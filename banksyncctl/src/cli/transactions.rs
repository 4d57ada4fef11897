use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::cli::Identifier;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List stored transactions, newest first
    List(List),
    /// Fetch transactions from the banks and store them
    Sync(Sync),
    /// Export stored transactions
    Export(Export),
}

#[derive(Args, Clone, Debug)]
pub struct Filter {
    /// Uuid or name of the account
    #[arg(short = 'a', long, help_heading = "Filter transactions")]
    pub account: Option<Identifier>,

    /// Show only transactions from this date
    #[arg(long, value_name = "DATE", help_heading = "Filter transactions")]
    pub after: Option<NaiveDate>,

    /// Show only transactions from before this date
    #[arg(long, value_name = "DATE", help_heading = "Filter transactions")]
    pub before: Option<NaiveDate>,

    /// Show only transactions of this category
    #[arg(long, help_heading = "Filter transactions")]
    pub category: Option<Identifier>,

    /// Show only transactions without a category
    #[arg(long, conflicts_with = "category", help_heading = "Filter transactions")]
    pub no_category: bool,

    /// Show only transactions with this counterparty, by its bank name
    #[arg(long, value_name = "NAME", help_heading = "Filter transactions")]
    pub counterparty: Option<String>,

    /// Maximum number of transactions to show
    #[arg(short = 'c', long, help_heading = "Filter transactions")]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct List {
    #[command(flatten)]
    pub filter: Filter,
}

#[derive(Args, Clone, Debug)]
pub struct Sync {
    /// Uuid or name of the account, all accounts otherwise
    #[arg(short = 'a', long)]
    pub account: Option<Identifier>,

    /// Fetch transactions from this date
    ///
    /// Defaults to the newest stored transaction of each account
    #[arg(long, value_name = "DATE")]
    pub after: Option<NaiveDate>,

    /// Fetch transactions until this date, defaults to now
    #[arg(long, value_name = "DATE")]
    pub before: Option<NaiveDate>,
}

#[derive(Args, Clone, Debug)]
pub struct Export {
    /// Write comma separated values to the standard output
    #[arg(long, required = true)]
    pub csv: bool,

    #[command(flatten)]
    pub filter: Filter,
}
