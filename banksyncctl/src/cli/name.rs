use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List display name mappings
    List(List),
    /// Show a counterparty under another name
    Add(Add),
    /// Delete a display name mapping
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {}

#[derive(Args, Clone, Debug)]
pub struct Add {
    /// Name of the counterparty as sent by the bank
    pub name: String,

    /// Name to show instead
    pub displayname: String,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Name of the counterparty as sent by the bank
    pub name: String,
}
