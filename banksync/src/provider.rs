//! Bank API clients
//!
//! A [`Provider`] yields the accounts, balances and transactions of one bank,
//! already converted to provider-neutral values. The sync dispatcher stores
//! them.

use crate::{essentials::*, result::ParseTypeError, Currency};

use chrono::{offset::Utc, DateTime};
use serde::Serialize;
use uuid::Uuid;

pub mod default_category;
pub mod starling;

pub use default_category::DefaultCategories;
pub use starling::StarlingProvider;

pub trait Provider: Send + Sync {
    /// Name of the bank the accounts belong to
    fn bank_name(&self) -> &str;

    fn accounts(&self) -> Result<Vec<ProviderAccount>>;

    fn balance(&self, account_uuid: Uuid) -> Result<AccountBalance>;

    fn transactions_between(
        &self,
        account_uuid: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ProviderTransaction>>;
}

#[derive(Debug, Clone)]
pub struct ProviderAccount {
    pub uuid: Uuid,
    pub bank_name: String,
    pub name: String,
    pub currency: Currency,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account_uuid: Uuid,
    pub cleared_balance: f32,
    pub effective_balance: f32,
    pub pending_transactions: f32,
    pub accepted_overdraft: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderTransaction {
    pub uuid: Uuid,
    pub account_uuid: Uuid,
    pub time: DateTime<Utc>,
    pub counterparty_uuid: Uuid,
    pub counterparty_name: String,
    pub amount: f32,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Starling,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starling => write!(f, "starling"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starling" => Ok(Self::Starling),
            _ => Err(ParseTypeError("provider", s.to_string())),
        }
    }
}

/// Convert an amount in minor units (pence, cents) to a decimal amount
pub(crate) fn from_minor_units(minor_units: i64) -> f32 {
    (minor_units as f64 / 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result};

    #[test]
    fn parse_kind() -> Result<()> {
        assert_eq!(ProviderKind::Starling, "starling".parse()?);
        assert_eq!(ProviderKind::Starling, "Starling".parse()?);
        assert_eq!(
            Err(ParseTypeError("provider", "monzo".to_string())),
            "monzo".parse::<ProviderKind>()
        );
        assert_eq!("starling", ProviderKind::Starling.to_string());

        Ok(())
    }

    #[test]
    fn minor_units() {
        assert_eq!(12.34, from_minor_units(1234));
        assert_eq!(-0.05, from_minor_units(-5));
        assert_eq!(0.0, from_minor_units(0));
    }
}
