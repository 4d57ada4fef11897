use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List banks
    List(List),
    /// Delete a bank along with its accounts and transactions
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {
    /// Maximum number of banks to show
    #[arg(short = 'c', long)]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Name of the bank to delete
    pub name: String,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}
