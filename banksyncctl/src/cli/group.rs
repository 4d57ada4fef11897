use clap::{Args, Subcommand};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List category groups
    List(List),
    /// Create a new category group
    Create(Create),
    /// Rename a category group
    Rename(Rename),
    /// Delete a category group along with its categories
    Delete(Delete),
}

#[derive(Args, Clone, Debug)]
pub struct List {}

#[derive(Args, Clone, Debug)]
pub struct Create {
    /// Name of the new group
    pub name: String,
}

#[derive(Args, Clone, Debug)]
pub struct Rename {
    /// Name of the group to rename
    pub name: String,

    /// New name of the group
    pub new_name: String,
}

#[derive(Args, Clone, Debug)]
pub struct Delete {
    /// Name of the group to delete
    pub name: String,

    /// Confirm deletion
    #[arg(long)]
    pub confirm: bool,
}
