//! Starling Bank public API, version 2

use super::{
    from_minor_units, AccountBalance, DefaultCategories, Provider, ProviderAccount,
    ProviderTransaction,
};
use crate::{essentials::*, Currency};

use chrono::{offset::Utc, DateTime};
use reqwest::blocking::Client;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use uuid::Uuid;

pub const API_BASE_URL: &str = "https://api.starlingbank.com/api/v2";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub struct StarlingProvider {
    bank_name: String,
    token: String,
    base_url: String,
    client: Client,
    default_categories: DefaultCategories,
}

impl StarlingProvider {
    pub fn new(bank_name: &str, token: &str, default_categories: DefaultCategories) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("banksync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            bank_name: bank_name.to_string(),
            token: token.to_string(),
            base_url: API_BASE_URL.to_string(),
            client,
            default_categories,
        })
    }

    /// Look up the default category of the account and remember it
    pub fn insert_default_category(&self, account_uuid: Uuid) -> Result<Uuid> {
        let accounts = self.get::<AccountsResponse>("/accounts", &[])?;
        let category = accounts
            .accounts
            .iter()
            .find(|account| account.account_uid == account_uuid)
            .map(|account| account.default_category)
            .ok_or_else(|| {
                Error::Provider(format!(
                    "No account {account_uuid} at {}",
                    self.bank_name
                ))
            })?;

        self.default_categories.set(account_uuid, category)?;
        Ok(category)
    }

    fn default_category(&self, account_uuid: Uuid) -> Result<Uuid> {
        self.default_categories.get(account_uuid)?.ok_or_else(|| {
            Error::Provider(format!(
                "No default category for {} account {account_uuid}, check configuration",
                self.bank_name
            ))
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url}");

        let body = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()?
            .error_for_status()?
            .text()?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl Provider for StarlingProvider {
    fn bank_name(&self) -> &str {
        &self.bank_name
    }

    fn accounts(&self) -> Result<Vec<ProviderAccount>> {
        self.get::<AccountsResponse>("/accounts", &[])?
            .into_provider(&self.bank_name)
    }

    fn balance(&self, account_uuid: Uuid) -> Result<AccountBalance> {
        Ok(self
            .get::<BalanceResponse>(&format!("/accounts/{account_uuid}/balance"), &[])?
            .into_provider(account_uuid))
    }

    fn transactions_between(
        &self,
        account_uuid: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ProviderTransaction>> {
        let category = self.default_category(account_uuid)?;
        let path =
            format!("/feed/account/{account_uuid}/category/{category}/transactions-between");
        let query = [
            ("minTransactionTimestamp", from.format(TIMESTAMP_FORMAT).to_string()),
            ("maxTransactionTimestamp", to.format(TIMESTAMP_FORMAT).to_string()),
        ];

        Ok(self
            .get::<FeedResponse>(&path, &query)?
            .into_provider(account_uuid))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsResponse {
    accounts: Vec<StarlingAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarlingAccount {
    account_uid: Uuid,
    default_category: Uuid,
    currency: String,
    created_at: Option<DateTime<Utc>>,
    name: String,
}

impl AccountsResponse {
    fn into_provider(self, bank_name: &str) -> Result<Vec<ProviderAccount>> {
        self.accounts
            .into_iter()
            .map(|account| {
                let currency = Currency::from_code(&account.currency).ok_or_else(|| {
                    Error::Provider(format!("Unknown currency {}", account.currency))
                })?;

                Ok(ProviderAccount {
                    uuid: account.account_uid,
                    bank_name: bank_name.to_string(),
                    name: account.name,
                    currency,
                    created_at: account.created_at,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyAndAmount {
    minor_units: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    cleared_balance: CurrencyAndAmount,
    effective_balance: CurrencyAndAmount,
    pending_transactions: CurrencyAndAmount,
    accepted_overdraft: CurrencyAndAmount,
}

impl BalanceResponse {
    fn into_provider(self, account_uuid: Uuid) -> AccountBalance {
        AccountBalance {
            account_uuid,
            cleared_balance: from_minor_units(self.cleared_balance.minor_units),
            effective_balance: from_minor_units(self.effective_balance.minor_units),
            pending_transactions: from_minor_units(self.pending_transactions.minor_units),
            accepted_overdraft: from_minor_units(self.accepted_overdraft.minor_units),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Direction {
    In,
    Out,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedResponse {
    feed_items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedItem {
    feed_item_uid: Uuid,
    amount: CurrencyAndAmount,
    direction: Direction,
    transaction_time: DateTime<Utc>,
    counter_party_uid: Option<Uuid>,
    counter_party_name: String,
    reference: Option<String>,
}

impl FeedResponse {
    fn into_provider(self, account_uuid: Uuid) -> Vec<ProviderTransaction> {
        self.feed_items
            .into_iter()
            .map(|item| {
                let amount = from_minor_units(item.amount.minor_units);
                let counterparty_uuid = item.counter_party_uid.unwrap_or_else(|| {
                    Uuid::new_v5(&Uuid::NAMESPACE_OID, item.counter_party_name.as_bytes())
                });

                ProviderTransaction {
                    uuid: item.feed_item_uid,
                    account_uuid,
                    time: item.transaction_time,
                    counterparty_uuid,
                    counterparty_name: item.counter_party_name,
                    amount: match item.direction {
                        Direction::In => amount,
                        Direction::Out => -amount,
                    },
                    reference: item.reference.filter(|r| !r.is_empty()),
                }
            })
            .collect()
    }
}
