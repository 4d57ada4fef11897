pub use crate::schema::transactions;
use crate::{
    account::Account,
    category::Category,
    counterparty::Counterparty,
    essentials::*,
    result::OptionalExtension,
    schema::{accounts, categories, counterparties},
};

use chrono::{offset::Utc, DateTime};
use diesel::{prelude::*, upsert::excluded};
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = transactions)]
#[diesel(belongs_to(Account, foreign_key = account_id))]
#[diesel(belongs_to(Counterparty, foreign_key = counterparty_id))]
#[diesel(belongs_to(Category, foreign_key = category_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    #[diesel(deserialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub time: DateTime<Utc>,
    pub counterparty_id: i64,
    pub amount: f32,
    pub reference: Option<String>,
    pub category_id: Option<i64>,
}

impl Transaction {
    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        transactions::table
            .find(id)
            .select(Transaction::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Transaction", None))
    }

    pub fn find_by_uuid(conn: &mut Conn, uuid: Uuid) -> Result<Self> {
        transactions::table
            .filter(transactions::uuid.eq(crate::db::Uuid(uuid)))
            .select(Transaction::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Transaction", Some("uuid")))
    }

    pub fn fetch_counterparty(&self, conn: &mut Conn) -> Result<Counterparty> {
        Counterparty::find(conn, self.counterparty_id)
    }

    pub fn fetch_category(&self, conn: &mut Conn) -> Result<Option<Category>> {
        self.category_id
            .map(|id| Category::find(conn, id))
            .transpose()
    }

    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

/// Delete every transaction of the account
pub fn delete_for_account(conn: &mut Conn, account_id: i64) -> Result<usize> {
    Ok(diesel::delete(transactions::table)
        .filter(transactions::account_id.eq(account_id))
        .execute(conn)?)
}

/// Time of the newest transaction of the account, if any
pub fn last_time_for_account(conn: &mut Conn, account_id: i64) -> Result<Option<DateTime<Utc>>> {
    transactions::table
        .filter(transactions::account_id.eq(account_id))
        .order(transactions::time.desc())
        .select(transactions::time)
        .first::<DateTime<Utc>>(conn)
        .map_err(Error::from)
        .optional()
}

pub struct NewTransaction<'a> {
    pub account: &'a Account,
    pub uuid: Uuid,
    pub time: DateTime<Utc>,
    pub counterparty: &'a Counterparty,
    pub amount: f32,
    pub reference: Option<&'a str>,
    pub category: Option<&'a Category>,
}

impl<'a> NewTransaction<'a> {
    pub fn new(account: &'a Account, counterparty: &'a Counterparty) -> Self {
        Self {
            account,
            uuid: Uuid::new_v4(),
            time: Utc::now(),
            counterparty,
            amount: 0.0,
            reference: None,
            category: None,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Transaction> {
        Ok(diesel::insert_into(transactions::table)
            .values(self.to_insertable())
            .returning(Transaction::as_returning())
            .get_result(conn)?)
    }

    /// Insert the transaction, or update the one with the same uuid
    ///
    /// The category of an existing transaction is left untouched.
    pub fn upsert(self, conn: &mut Conn) -> Result<Transaction> {
        Ok(diesel::insert_into(transactions::table)
            .values(self.to_insertable())
            .on_conflict(transactions::uuid)
            .do_update()
            .set((
                transactions::time.eq(excluded(transactions::time)),
                transactions::counterparty_id.eq(excluded(transactions::counterparty_id)),
                transactions::amount.eq(excluded(transactions::amount)),
                transactions::reference.eq(excluded(transactions::reference)),
            ))
            .returning(Transaction::as_returning())
            .get_result(conn)?)
    }

    pub fn to_insertable(&self) -> InsertableTransaction<'a> {
        InsertableTransaction {
            account_id: self.account.id,
            uuid: self.uuid,
            time: self.time,
            counterparty_id: self.counterparty.id,
            amount: self.amount,
            reference: self.reference,
            category_id: self.category.map(|c| c.id),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub struct InsertableTransaction<'a> {
    pub account_id: i64,
    #[diesel(serialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub time: DateTime<Utc>,
    pub counterparty_id: i64,
    pub amount: f32,
    pub reference: Option<&'a str>,
    pub category_id: Option<i64>,
}

#[derive(Default)]
pub struct ChangeTransaction<'a> {
    pub reference: Option<Option<&'a str>>,
    pub category: Option<Option<&'a Category>>,
}

impl<'a> ChangeTransaction<'a> {
    pub fn to_changeset(&self) -> TransactionChangeset<'a> {
        TransactionChangeset {
            reference: self.reference,
            category_id: self.category.map(|c| c.map(|c| c.id)),
        }
    }

    pub fn save(self, conn: &mut Conn, transaction: &Transaction) -> Result<()> {
        diesel::update(transaction)
            .set(self.to_changeset())
            .execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, transaction: &mut Transaction) -> Result<()> {
        let changeset = self.to_changeset();
        self.save(conn, transaction)?;

        if let Some(value) = changeset.reference {
            transaction.reference = value.map(str::to_string);
        }
        if let Some(value) = changeset.category_id {
            transaction.category_id = value;
        }

        Ok(())
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = transactions)]
pub struct TransactionChangeset<'a> {
    pub reference: Option<Option<&'a str>>,
    pub category_id: Option<Option<i64>>,
}

#[derive(Default)]
pub struct QueryTransaction {
    pub account_id: Option<i64>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub counterparty_id: Option<i64>,
    pub category_id: Option<Option<i64>>,
    pub count: Option<i64>,
}

pub type QueryTransactionResult = (Transaction, Account, Counterparty, Option<Category>);

impl QueryTransaction {
    /// Matching transactions, newest first
    pub fn run(&self, conn: &mut Conn) -> Result<Vec<QueryTransactionResult>> {
        let mut query = transactions::table
            .inner_join(accounts::table)
            .inner_join(counterparties::table)
            .left_join(categories::table)
            .into_boxed();

        if let Some(account_id) = self.account_id {
            query = query.filter(transactions::account_id.eq(account_id));
        }
        if let Some(date) = self.after {
            query = query.filter(transactions::time.ge(date));
        }
        if let Some(date) = self.before {
            query = query.filter(transactions::time.lt(date));
        }
        if let Some(counterparty_id) = self.counterparty_id {
            query = query.filter(transactions::counterparty_id.eq(counterparty_id));
        }
        match self.category_id {
            Some(Some(category_id)) => {
                query = query.filter(transactions::category_id.eq(category_id));
            }
            Some(None) => {
                query = query.filter(transactions::category_id.is_null());
            }
            None => {}
        }
        if let Some(count) = self.count {
            query = query.limit(count);
        }

        Ok(query
            .order((transactions::time.desc(), transactions::id.desc()))
            .select((
                Transaction::as_select(),
                Account::as_select(),
                Counterparty::as_select(),
                Option::<Category>::as_select(),
            ))
            .load::<QueryTransactionResult>(conn)?)
    }
}
