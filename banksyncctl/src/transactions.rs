use anyhow::Result;
use serde::Serialize;

use banksync::{
    prelude::*,
    provider::ProviderTransaction,
    transaction::{QueryTransaction, QueryTransactionResult},
};

use crate::cli::{date_to_utc, transactions::*};
use crate::config::Config;

struct CommandContext<'a> {
    config: &'a Config,
    conn: &'a mut Conn,
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let mut cmd = CommandContext { config, conn };

    match command {
        Command::List(args) => cmd.list(args),
        Command::Sync(args) => cmd.sync(args),
        Command::Export(args) => cmd.export(args),
    }
}

impl Filter {
    fn query(&self, conn: &mut Conn) -> Result<QueryTransaction> {
        let account = self.account.as_ref().map(|a| a.account(conn)).transpose()?;
        let category_id = if self.no_category {
            Some(None)
        } else {
            self.category
                .as_ref()
                .map(|c| c.category(conn))
                .transpose()?
                .map(|c| Some(c.id))
        };
        let counterparty = self
            .counterparty
            .as_deref()
            .map(|name| Counterparty::find_by_name(conn, name))
            .transpose()?;

        Ok(QueryTransaction {
            account_id: account.map(|a| a.id),
            after: date_to_utc(self.after)?,
            before: date_to_utc(self.before)?,
            counterparty_id: counterparty.map(|c| c.id),
            category_id,
            count: self.count.map(i64::from),
        })
    }
}

#[derive(Debug, Serialize)]
struct ExportRow {
    uuid: String,
    time: String,
    bank: String,
    account: String,
    counterparty: String,
    amount: f32,
    currency: String,
    category: Option<String>,
    reference: Option<String>,
}

impl CommandContext<'_> {
    fn list(&mut self, args: &List) -> Result<()> {
        let transactions = args.filter.query(self.conn)?.run(self.conn)?;

        let mut builder = tabled::builder::Builder::new();
        builder.push_record([
            "uuid",
            "time",
            "account",
            "counterparty",
            "amount",
            "category",
            "reference",
        ]);

        for (transaction, account, counterparty, category) in transactions {
            push_record!(
                builder,
                transaction.uuid,
                transaction.time,
                account.display_name,
                counterparty.shown_name(),
                (transaction.amount, account.currency),
                category,
                transaction.reference,
            );
        }

        println!("{}", builder.build());
        Ok(())
    }

    fn sync(&mut self, args: &Sync) -> Result<()> {
        let dispatcher = self.config.dispatcher()?;
        let after = date_to_utc(args.after)?;
        let before = date_to_utc(args.before)?;

        let fetched = match &args.account {
            Some(identifier) => {
                let account = identifier.account(self.conn)?;
                dispatcher.sync_transactions(self.conn, &account, after, before)?
            }
            None => dispatcher.sync_all_transactions(self.conn, after, before)?,
        };

        self.print_fetched(&fetched)
    }

    fn print_fetched(&mut self, fetched: &[ProviderTransaction]) -> Result<()> {
        let mut builder = tabled::builder::Builder::new();
        builder.push_record(["uuid", "time", "counterparty", "amount", "category"]);

        for fetched in fetched {
            let transaction = Transaction::find_by_uuid(self.conn, fetched.uuid)?;
            let account = Account::find(self.conn, transaction.account_id)?;
            let counterparty = transaction.fetch_counterparty(self.conn)?;
            let category = transaction.fetch_category(self.conn)?;

            push_record!(
                builder,
                transaction.uuid,
                transaction.time,
                counterparty.shown_name(),
                (transaction.amount, account.currency),
                category,
            );
        }

        println!("Fetched {} transactions", fetched.len());
        if !fetched.is_empty() {
            println!("{}", builder.build());
        }
        Ok(())
    }

    fn export(&mut self, args: &Export) -> Result<()> {
        let transactions = args.filter.query(self.conn)?.run(self.conn)?;

        let mut writer = csv::Writer::from_writer(std::io::stdout());
        for row in transactions {
            writer.serialize(self.export_row(row)?)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn export_row(&mut self, row: QueryTransactionResult) -> Result<ExportRow> {
        let (transaction, account, counterparty, category) = row;
        let bank = account.fetch_bank(self.conn)?;

        Ok(ExportRow {
            uuid: transaction.uuid.to_string(),
            time: transaction.time.to_rfc3339(),
            bank: bank.name,
            account: account.display_name,
            counterparty: counterparty.shown_name().to_string(),
            amount: transaction.amount,
            currency: account.currency.code().to_string(),
            category: category.map(|c| c.name),
            reference: transaction.reference,
        })
    }
}
