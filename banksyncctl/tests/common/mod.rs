#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::{fixture::PathChild, TempDir};

use banksync::{
    account::NewAccount,
    counterparty::NewCounterparty,
    prelude::{Account, Bank, Conn, Counterparty, Database},
    transaction::NewTransaction,
};

pub mod prelude {
    pub use super::Env;
    pub use anyhow::Result;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;
    pub use predicates::str;
}

pub struct Env {
    pub conf_dir: TempDir,
    pub data_dir: TempDir,
}

#[allow(unused_macros)]
macro_rules! cmd {
    ($env:ident, $($tail:tt)*) => {
        raw_cmd!($env, $($tail)*).assert()
    };
}

#[allow(unused_macros)]
macro_rules! raw_cmd {
    ($env:ident, $($tail:tt)*) => {
        raw_cmd!(@args $env.command()?, $($tail)* )
    };
    (@args $cmd:expr, --$arg:tt) => {
        $cmd.arg(concat!("--", stringify!($arg)))
    };
    (@args $cmd:expr, $arg:tt) => {
        $cmd.arg(stringify!($arg))
    };
    (@args $cmd:expr, --$arg:tt $($tail:tt)*) => {
        raw_cmd!(@args $cmd.arg(raw_cmd!(@arg --$arg)), $($tail)*)
    };
    (@args $cmd:expr, $arg:tt $($tail:tt)*) => {
        raw_cmd!(@args $cmd.arg(raw_cmd!(@arg $arg)), $($tail)*)
    };
    (@arg --$arg:tt) => { concat!("--", stringify!($arg)) };
    (@arg $arg:tt) => { stringify!($arg) };
}

impl Env {
    pub fn new() -> Result<Self> {
        Ok(Self {
            conf_dir: TempDir::new()?,
            data_dir: TempDir::new()?,
        })
    }

    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("banksyncctl")?;
        cmd.arg("-C")
            .arg(self.conf_dir.path())
            .arg("-D")
            .arg(self.data_dir.path());
        Ok(cmd)
    }

    /// Connection to the database used by the commands
    pub fn conn(&self) -> Result<Conn> {
        let mut db = Database::open(self.data_dir.child("db.banksync").path())?;
        db.setup()?;
        Ok(db.into())
    }

    /// Store an account the way a sync would
    pub fn account(&self, bank_name: &str, name: &str) -> Result<Account> {
        let conn = &mut self.conn()?;
        let bank = Bank::upsert(conn, bank_name)?;
        Ok(NewAccount::new(&bank, name).save(conn)?)
    }

    /// Store a transaction of the account, returns its uuid
    pub fn transaction(
        &self,
        account: &Account,
        counterparty_name: &str,
        amount: f32,
        time: &str,
    ) -> Result<uuid::Uuid> {
        let conn = &mut self.conn()?;
        let counterparty = match Counterparty::find_by_name(conn, counterparty_name) {
            Ok(counterparty) => counterparty,
            Err(_) => NewCounterparty::new(counterparty_name).save(conn)?,
        };

        Ok(NewTransaction {
            amount,
            time: time.parse()?,
            ..NewTransaction::new(account, &counterparty)
        }
        .save(conn)?
        .uuid)
    }
}
