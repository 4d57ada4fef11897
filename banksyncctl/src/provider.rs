use anyhow::{anyhow, Result};

use banksync::{provider::ProviderKind, OptionalExtension};

use crate::cli::provider::*;
use crate::config::Config;

pub fn run(config: &Config, command: &Command) -> Result<()> {
    match command {
        Command::DefaultCategory { command } => match command {
            DefaultCategory::List => list(config),
            DefaultCategory::Add(args) => add(config, args),
            DefaultCategory::Remove(args) => remove(config, args),
        },
    }
}

fn list(config: &Config) -> Result<()> {
    for (account, category) in config.default_categories().all()? {
        println!("{account} | {category}");
    }

    Ok(())
}

fn add(config: &Config, args: &Account) -> Result<()> {
    let bank_name = match &args.bank {
        Some(name) => name.clone(),
        None => {
            let conn = &mut config.database()?;
            let account = banksync::account::Account::find_by_uuid(conn, args.account)
                .optional()?
                .ok_or_else(|| {
                    anyhow!("Account {} is not stored yet, use --bank", args.account)
                })?;
            account.fetch_bank(conn)?.name
        }
    };

    let bank = config.bank(&bank_name)?;
    if bank.provider != ProviderKind::Starling {
        anyhow::bail!("Bank {bank_name} does not use default categories");
    }

    let category = config.starling(&bank)?.insert_default_category(args.account)?;
    println!("{} | {category}", args.account);

    Ok(())
}

fn remove(config: &Config, args: &Account) -> Result<()> {
    if !config.default_categories().remove(args.account)? {
        anyhow::bail!("No default category for account {}", args.account);
    }

    Ok(())
}
