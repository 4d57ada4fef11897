pub mod db;
pub mod result;
pub mod schema;

mod database;
pub use database::{Database, MIGRATIONS};

pub mod account;
pub mod bank;
pub mod category;
pub mod counterparty;
pub mod mapper;
pub mod provider;
pub mod sync;
pub mod transaction;


pub type Conn = diesel::sqlite::SqliteConnection;

pub use oxydized_money::Currency;
pub use result::{Error, OptionalExtension, Result};

pub(crate) mod essentials {
    pub use crate::result::{Error, OptionalExtension, Result};
    pub use crate::Conn;
}

pub mod prelude {
    pub use crate::{
        account::Account,
        bank::Bank,
        category::{Category, CategoryGroup},
        counterparty::Counterparty,
        provider::Provider,
        sync::Dispatcher,
        transaction::Transaction,
        Conn, Currency, Database, Error, OptionalExtension, Result,
    };
}
