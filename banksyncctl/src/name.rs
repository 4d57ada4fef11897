use anyhow::Result;

use banksync::mapper::NameMapper;

use crate::cli::name::*;
use crate::config::Config;

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;

    match command {
        Command::List(_) => {
            let mut builder = tabled::builder::Builder::new();
            builder.push_record(["name", "display name"]);
            for map in NameMapper::all(conn)? {
                push_record!(builder, map.name, map.displayname);
            }
            println!("{}", builder.build());
        }
        Command::Add(args) => {
            NameMapper::insert(conn, &args.name, &args.displayname)?;
        }
        Command::Delete(args) => {
            NameMapper::delete(conn, &args.name)?;
        }
    }

    Ok(())
}
