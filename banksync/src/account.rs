pub use crate::schema::accounts;
use crate::{bank::Bank, essentials::*, schema::banks, transaction::Transaction, Currency};

use chrono::{offset::Utc, DateTime};
use diesel::{prelude::*, upsert::excluded};
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = accounts)]
#[diesel(belongs_to(Bank, foreign_key = bank_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Account {
    pub id: i64,
    pub bank_id: i64,
    #[diesel(deserialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: String,
    pub display_name: String,
    #[diesel(deserialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        accounts::table
            .find(id)
            .select(Account::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Account", None))
    }

    pub fn find_by_uuid(conn: &mut Conn, uuid: Uuid) -> Result<Self> {
        accounts::table
            .filter(accounts::uuid.eq(crate::db::Uuid(uuid)))
            .select(Account::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Account", Some("uuid")))
    }

    /// Find an account by name, across all banks
    ///
    /// Names are only unique per bank, so an ambiguous name is an error.
    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        let mut found = accounts::table
            .filter(accounts::name.eq(name))
            .select(Account::as_select())
            .limit(2)
            .load(conn)?;

        match found.len() {
            0 => Err(Error::ModelNotFoundBy("Account", "name")),
            1 => Ok(found.remove(0)),
            _ => Err(Error::Invalid(format!(
                "Several accounts are named {name}, use the uuid instead"
            ))),
        }
    }

    pub fn fetch_bank(&self, conn: &mut Conn) -> Result<Bank> {
        Bank::find(conn, self.bank_id)
    }

    /// Transactions of the account, newest first
    pub fn transactions(&self, conn: &mut Conn) -> Result<Vec<Transaction>> {
        use crate::schema::transactions;

        Ok(Transaction::belonging_to(self)
            .order(transactions::time.desc())
            .select(Transaction::as_select())
            .load(conn)?)
    }

    /// Delete the account along with its transactions
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

pub struct NewAccount<'a> {
    pub bank: &'a Bank,
    pub uuid: Uuid,
    pub name: &'a str,
    pub display_name: Option<&'a str>,
    pub currency: Currency,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'a> NewAccount<'a> {
    pub fn new(bank: &'a Bank, name: &'a str) -> Self {
        Self {
            bank,
            uuid: Uuid::new_v4(),
            name,
            display_name: None,
            currency: Currency::GBP,
            created_at: None,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Account> {
        Ok(diesel::insert_into(accounts::table)
            .values(self.to_insertable())
            .returning(Account::as_returning())
            .get_result(conn)?)
    }

    /// Insert the account, or update the name, currency and creation date of
    /// the account with the same uuid
    ///
    /// The display name of an existing account is left untouched.
    pub fn upsert(self, conn: &mut Conn) -> Result<Account> {
        Ok(diesel::insert_into(accounts::table)
            .values(self.to_insertable())
            .on_conflict(accounts::uuid)
            .do_update()
            .set((
                accounts::name.eq(excluded(accounts::name)),
                accounts::currency.eq(excluded(accounts::currency)),
                accounts::created_at.eq(excluded(accounts::created_at)),
            ))
            .returning(Account::as_returning())
            .get_result(conn)?)
    }

    pub fn to_insertable(&self) -> InsertableAccount<'a> {
        InsertableAccount {
            bank_id: self.bank.id,
            uuid: self.uuid,
            name: self.name,
            display_name: self.display_name.unwrap_or(self.name),
            currency: self.currency,
            created_at: self.created_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = accounts)]
pub struct InsertableAccount<'a> {
    pub bank_id: i64,
    #[diesel(serialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: &'a str,
    pub display_name: &'a str,
    #[diesel(serialize_as = crate::db::Currency)]
    pub currency: Currency,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub struct ChangeAccount<'a> {
    pub name: Option<&'a str>,
    pub display_name: Option<&'a str>,
}

impl ChangeAccount<'_> {
    pub fn save(self, conn: &mut Conn, account: &Account) -> Result<()> {
        diesel::update(account).set(self).execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, account: &mut Account) -> Result<()> {
        self.clone().save(conn, account)?;

        if let Some(value) = self.name {
            account.name = value.to_string();
        }
        if let Some(value) = self.display_name {
            account.display_name = value.to_string();
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct QueryAccount<'a> {
    pub bank_id: Option<i64>,
    pub name: Option<&'a str>,
    pub count: Option<i64>,
}

pub type QueryAccountResult = (Account, Bank);

impl QueryAccount<'_> {
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<QueryAccountResult>> {
        let mut query = accounts::table.inner_join(banks::table).into_boxed();

        if let Some(bank_id) = self.bank_id {
            query = query.filter(accounts::bank_id.eq(bank_id));
        }
        if let Some(name) = self.name {
            query = query.filter(accounts::name.like(name));
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order((banks::name.asc(), accounts::name.asc()))
            .select((Account::as_select(), Bank::as_select()))
            .load::<QueryAccountResult>(conn)?)
    }
}
