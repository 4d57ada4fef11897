use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Starling default categories, needed to fetch transactions
    DefaultCategory {
        #[command(subcommand)]
        command: DefaultCategory,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DefaultCategory {
    /// List known default categories
    List,
    /// Fetch and remember the default category of an account
    Add(Account),
    /// Forget the default category of an account
    Remove(Account),
}

#[derive(Args, Clone, Debug)]
pub struct Account {
    /// Uuid of the account
    pub account: Uuid,

    /// Name of the configured bank holding the account
    ///
    /// Defaults to the bank the account is stored under
    #[arg(long, value_name = "NAME")]
    pub bank: Option<String>,
}
