use clap::{Args, Subcommand};

use crate::cli::Identifier;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List stored accounts
    List(List),
    /// Show details about an account
    Show(Show),
    /// Update an account
    Update(Update),
    /// Delete an account along with its transactions
    Delete(Delete),
    /// Fetch the accounts of every configured bank
    Sync(Sync),
}

#[derive(Args, Clone, Debug)]
pub struct List {
    /// Show only accounts of this bank
    #[arg(long, value_name = "NAME", help_heading = "Filter accounts")]
    pub bank: Option<String>,

    /// Maximum number of accounts to show
    #[arg(short = 'c', long, help_heading = "Filter accounts")]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct Show {
    /// Uuid or name of the account
    pub account: Identifier,
}

#[derive(Args, Clone, Debug)]
pub struct Update {
    /// Uuid or name of the account
    pub account: Identifier,

    /// New name of the account
    #[arg(long)]
    pub new_name: Option<String>,

    /// Name shown instead of the bank's name of the account
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Uuid or name of the account
    pub account: Identifier,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Sync {}
