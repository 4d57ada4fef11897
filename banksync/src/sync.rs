//! Fetch data from the providers and store it

use crate::{
    account::{Account, NewAccount, QueryAccount},
    bank::Bank,
    counterparty::{Counterparty, NewCounterparty},
    essentials::*,
    mapper::{CategoryMapper, NameMapper},
    provider::{AccountBalance, Provider, ProviderTransaction},
    transaction::{self, NewTransaction, Transaction},
};

use chrono::{offset::Utc, DateTime, TimeDelta};
use diesel::Connection;

pub const DEFAULT_INTERVAL_DAYS: i64 = 7;

pub struct Dispatcher {
    providers: Vec<Box<dyn Provider>>,
    default_interval: TimeDelta,
}

impl Dispatcher {
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self {
            providers,
            default_interval: TimeDelta::days(DEFAULT_INTERVAL_DAYS),
        }
    }

    /// How far back to look for the transactions of an account that has none
    pub fn with_default_interval_days(mut self, days: i64) -> Self {
        self.default_interval = TimeDelta::days(days);
        self
    }

    pub fn default_interval(&self) -> TimeDelta {
        self.default_interval
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn provider(&self, bank_name: &str) -> Option<&dyn Provider> {
        self.providers()
            .find(|provider| provider.bank_name() == bank_name)
    }

    /// Fetch the accounts of every provider and store them
    pub fn sync_accounts(&self, conn: &mut Conn) -> Result<Vec<Account>> {
        let mut synced = Vec::new();

        for provider in self.providers() {
            let accounts = provider.accounts()?;
            log::info!(
                "Fetched {} accounts from {}",
                accounts.len(),
                provider.bank_name()
            );

            conn.transaction(|conn| {
                let bank = Bank::upsert(conn, provider.bank_name())?;
                for account in &accounts {
                    synced.push(
                        NewAccount {
                            uuid: account.uuid,
                            currency: account.currency,
                            created_at: account.created_at,
                            ..NewAccount::new(&bank, &account.name)
                        }
                        .upsert(conn)?,
                    );
                }
                Result::<()>::Ok(())
            })?;
        }

        Ok(synced)
    }

    /// Live balance of every stored account whose bank has a provider
    pub fn balances(&self, conn: &mut Conn) -> Result<Vec<AccountBalance>> {
        let mut balances = Vec::new();

        for (account, bank) in QueryAccount::default().run(conn)? {
            match self.provider(&bank.name) {
                Some(provider) => balances.push(provider.balance(account.uuid)?),
                None => log::warn!("No provider for bank {}, skipping {}", bank.name, account.name),
            }
        }

        Ok(balances)
    }

    /// Fetch and store the transactions of the account, newest first
    ///
    /// Without `from`, starts at the newest stored transaction of the account,
    /// or the default interval before `to` when there is none.
    pub fn sync_transactions(
        &self,
        conn: &mut Conn,
        account: &Account,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProviderTransaction>> {
        let bank = account.fetch_bank(conn)?;
        let Some(provider) = self.provider(&bank.name) else {
            log::warn!("No provider for bank {}, skipping {}", bank.name, account.name);
            return Ok(Vec::new());
        };

        let to = to.unwrap_or_else(Utc::now);
        let from = match from {
            Some(from) => from,
            None => transaction::last_time_for_account(conn, account.id)?
                .unwrap_or(to - self.default_interval),
        };

        let mut transactions = provider.transactions_between(account.uuid, from, to)?;
        log::info!(
            "Fetched {} transactions for {} between {from} and {to}",
            transactions.len(),
            account.name
        );

        conn.transaction(|conn| {
            for transaction in &transactions {
                store(conn, account, transaction)?;
            }
            Result::<()>::Ok(())
        })?;

        transactions.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(transactions)
    }

    /// Fetch and store the transactions of every account, newest first
    ///
    /// An account whose provider fails is skipped with a warning.
    pub fn sync_all_transactions(
        &self,
        conn: &mut Conn,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ProviderTransaction>> {
        let to = to.unwrap_or_else(Utc::now);
        let mut transactions = Vec::new();

        for (account, _) in QueryAccount::default().run(conn)? {
            match self.sync_transactions(conn, &account, from, Some(to)) {
                Ok(fetched) => transactions.extend(fetched),
                Err(e) if e.is_provider() => {
                    log::warn!("Skipping transactions of {}: {e}", account.name);
                }
                Err(e) => return Err(e),
            }
        }

        transactions.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(transactions)
    }
}

fn store(conn: &mut Conn, account: &Account, fetched: &ProviderTransaction) -> Result<Transaction> {
    let displayname = NameMapper::displayname(conn, &fetched.counterparty_name)?;
    // Without a mapping, keep a display name set by hand
    let display_name = if displayname != fetched.counterparty_name {
        Some(displayname.clone())
    } else {
        Counterparty::find_by_uuid(conn, fetched.counterparty_uuid)
            .optional()?
            .and_then(|c| c.display_name)
    };
    let counterparty = NewCounterparty {
        uuid: fetched.counterparty_uuid,
        name: &fetched.counterparty_name,
        display_name: display_name.as_deref(),
    }
    .upsert(conn)?;

    let category = match Transaction::find_by_uuid(conn, fetched.uuid).optional()? {
        Some(_) => None,
        None => CategoryMapper::category(conn, &displayname)?,
    };

    NewTransaction {
        account,
        uuid: fetched.uuid,
        time: fetched.time,
        counterparty: &counterparty,
        amount: fetched.amount,
        reference: fetched.reference.as_deref(),
        category: category.as_ref(),
    }
    .upsert(conn)
}
