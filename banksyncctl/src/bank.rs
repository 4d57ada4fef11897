use anyhow::Result;

use banksync::{bank::QueryBank, prelude::*};

use crate::cli::bank::*;
use crate::config::Config;
use crate::utils::require_confirmation;

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;

    match command {
        Command::List(args) => list(config, conn, args),
        Command::Delete(args) => delete(conn, args),
    }
}

fn list(config: &Config, conn: &mut Conn, args: &List) -> Result<()> {
    let configured = config.banks()?;
    let mut builder = tabled::builder::Builder::new();
    builder.push_record(["name", "accounts", "provider"]);

    for bank in (QueryBank {
        count: args.count.map(i64::from),
        ..Default::default()
    })
    .run(conn)?
    {
        let provider = configured
            .iter()
            .find(|c| c.name == bank.name)
            .map(|c| c.provider.to_string());
        let accounts = bank.accounts(conn)?.len().to_string();
        push_record!(builder, bank.name, accounts, provider);
    }

    println!("{}", builder.build());
    Ok(())
}

fn delete(conn: &mut Conn, args: &Delete) -> Result<()> {
    let mut bank = Bank::find_by_name(conn, &args.name)?;

    require_confirmation(args.confirm)?;
    bank.delete(conn)?;

    Ok(())
}
