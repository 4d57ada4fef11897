use anyhow::Result;

use banksync::{category::NewCategoryGroup, prelude::*};

use crate::cli::group::*;
use crate::config::Config;
use crate::utils::require_confirmation;

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;

    match command {
        Command::List(_) => {
            for group in CategoryGroup::all(conn)? {
                let names = group
                    .categories(conn)?
                    .into_iter()
                    .map(|c| c.name)
                    .collect::<Vec<_>>();
                println!("{} | {}", group.name, names.join(", "));
            }
        }
        Command::Create(args) => {
            NewCategoryGroup::new(&args.name).save(conn)?;
        }
        Command::Rename(args) => {
            CategoryGroup::find_by_name(conn, &args.name)?.rename(conn, &args.new_name)?;
        }
        Command::Delete(args) => {
            let mut group = CategoryGroup::find_by_name(conn, &args.name)?;
            require_confirmation(args.confirm)?;
            group.delete(conn)?;
        }
    }

    Ok(())
}
