use anyhow::Result;

use banksync::{
    account::{ChangeAccount, QueryAccount},
    prelude::*,
    transaction::QueryTransaction,
};

use crate::cli::account::*;
use crate::config::Config;
use crate::utils::require_confirmation;

struct CommandContext<'a> {
    config: &'a Config,
    conn: &'a mut Conn,
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let mut cmd = CommandContext { config, conn };

    match command {
        Command::List(args) => cmd.list(args),
        Command::Show(args) => cmd.show(args),
        Command::Update(args) => cmd.update(args),
        Command::Delete(args) => cmd.delete(args),
        Command::Sync(_) => cmd.sync(),
    }
}

impl CommandContext<'_> {
    fn list(&mut self, args: &List) -> Result<()> {
        let bank = args
            .bank
            .as_deref()
            .map(|name| Bank::find_by_name(self.conn, name))
            .transpose()?;

        let mut builder = tabled::builder::Builder::new();
        builder.push_record(["uuid", "bank", "name", "display name", "currency"]);

        for (account, bank) in (QueryAccount {
            bank_id: bank.map(|b| b.id),
            count: args.count.map(i64::from),
            ..Default::default()
        })
        .run(self.conn)?
        {
            push_record!(
                builder,
                account.uuid,
                bank.name,
                account.name,
                account.display_name,
                account.currency.code(),
            );
        }

        println!("{}", builder.build());
        Ok(())
    }

    fn show(&mut self, args: &Show) -> Result<()> {
        let account = args.account.account(self.conn)?;
        let bank = account.fetch_bank(self.conn)?;

        println!("{} | {}", account.uuid, account.display_name);
        println!("  Bank: {}", bank.name);
        println!("  Name: {}", account.name);
        println!("  Currency: {}", account.currency.code());
        if let Some(created_at) = account.created_at {
            println!("  Created at: {}", created_at.format("%Y-%m-%d"));
        }

        let transactions = QueryTransaction {
            account_id: Some(account.id),
            ..Default::default()
        }
        .run(self.conn)?;
        let total = transactions.iter().map(|t| t.0.amount as f64).sum::<f64>();
        println!(
            "  Transactions: {} for {} {:.2}",
            transactions.len(),
            account.currency.code(),
            total
        );

        Ok(())
    }

    fn update(&mut self, args: &Update) -> Result<()> {
        let mut account = args.account.account(self.conn)?;

        ChangeAccount {
            name: args.new_name.as_deref(),
            display_name: args.display_name.as_deref(),
        }
        .apply(self.conn, &mut account)
        .optional_empty_changeset()?;

        Ok(())
    }

    fn delete(&mut self, args: &Delete) -> Result<()> {
        let mut account = args.account.account(self.conn)?;

        require_confirmation(args.confirm)?;
        account.delete(self.conn)?;

        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        let accounts = self.config.dispatcher()?.sync_accounts(self.conn)?;

        for account in accounts {
            println!("{} | {}", account.uuid, account.display_name);
        }

        Ok(())
    }
}
