use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::Identifier;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List categories
    List(List),
    /// Create a new category
    Create(Create),
    /// Rename a category
    Rename(Rename),
    /// Move a category to another group
    ChangeGroup(ChangeGroup),
    /// Delete a category, its transactions become uncategorized
    Delete(Delete),
    /// Set or clear the category of a transaction
    Assign(Assign),
    /// Create the default groups and categories
    Init(Init),
    /// Categorize new transactions of a counterparty
    Map(Map),
    /// Delete a category mapping
    Unmap(Unmap),
    /// List category mappings
    Maps(Maps),
}

#[derive(Args, Clone, Debug)]
pub struct List {
    /// Show only categories with this text in the name
    #[arg(long, help_heading = "Filter categories")]
    pub name: Option<String>,

    /// Show only categories of this group
    #[arg(long, value_name = "NAME", help_heading = "Filter categories")]
    pub group: Option<String>,

    /// Maximum number of categories to show
    #[arg(short = 'c', long, help_heading = "Filter categories")]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct Create {
    /// Name of the group, created if needed
    pub group: String,

    /// Name of the new category
    pub name: String,

    /// Uuid of the category, an existing category with this uuid is updated
    #[arg(long)]
    pub uuid: Option<Uuid>,
}

#[derive(Args, Clone, Debug)]
pub struct Rename {
    /// Uuid, name or group:name of the category
    pub category: Identifier,

    /// New name of the category
    pub new_name: String,
}

#[derive(Args, Clone, Debug)]
pub struct ChangeGroup {
    /// Uuid, name or group:name of the category
    pub category: Identifier,

    /// Name of the new group, created if needed
    pub group: String,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Uuid, name or group:name of the category
    pub category: Identifier,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Assign {
    /// Uuid of the transaction
    pub transaction: Uuid,

    /// Uuid, name or group:name of the category
    #[arg(required_unless_present = "none")]
    pub category: Option<Identifier>,

    /// Remove the category of the transaction
    #[arg(long, conflicts_with = "category")]
    pub none: bool,
}

#[derive(Args, Clone, Debug)]
pub struct Init {}

#[derive(Args, Clone, Debug)]
pub struct Map {
    /// Display name of the counterparty
    pub displayname: String,

    /// Uuid, name or group:name of the category
    pub category: Identifier,
}

#[derive(Args, Clone, Debug)]
pub struct Unmap {
    /// Display name of the counterparty
    pub displayname: String,
}

#[derive(Args, Clone, Debug)]
pub struct Maps {}
