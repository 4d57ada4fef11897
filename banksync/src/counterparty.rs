pub use crate::schema::counterparties;
use crate::{essentials::*, transaction::Transaction};

use diesel::{prelude::*, upsert::excluded};
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = counterparties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Counterparty {
    pub id: i64,
    #[diesel(deserialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: String,
    pub display_name: Option<String>,
}

impl Counterparty {
    /// Name to show to the user, the display name when there is one
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn find(conn: &mut Conn, id: i64) -> Result<Self> {
        counterparties::table
            .find(id)
            .select(Counterparty::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Counterparty", None))
    }

    pub fn find_by_uuid(conn: &mut Conn, uuid: Uuid) -> Result<Self> {
        counterparties::table
            .filter(counterparties::uuid.eq(crate::db::Uuid(uuid)))
            .select(Counterparty::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Counterparty", Some("uuid")))
    }

    pub fn find_by_name(conn: &mut Conn, name: &str) -> Result<Self> {
        counterparties::table
            .filter(counterparties::name.eq(name))
            .select(Counterparty::as_select())
            .first(conn)
            .map_err(|e| Error::from_diesel_error(e, "Counterparty", Some("name")))
    }

    pub fn transactions(&self, conn: &mut Conn) -> Result<Vec<Transaction>> {
        use crate::schema::transactions;

        Ok(Transaction::belonging_to(self)
            .order(transactions::time.desc())
            .select(Transaction::as_select())
            .load(conn)?)
    }

    /// Delete the counterparty along with its transactions
    pub fn delete(&mut self, conn: &mut Conn) -> Result<()> {
        diesel::delete(&*self).execute(conn)?;

        Ok(())
    }
}

#[derive(Clone, Insertable)]
#[diesel(table_name = counterparties)]
pub struct NewCounterparty<'a> {
    #[diesel(serialize_as = crate::db::Uuid)]
    pub uuid: Uuid,
    pub name: &'a str,
    pub display_name: Option<&'a str>,
}

impl<'a> NewCounterparty<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name,
            display_name: None,
        }
    }

    pub fn save(self, conn: &mut Conn) -> Result<Counterparty> {
        Ok(diesel::insert_into(counterparties::table)
            .values(self)
            .returning(Counterparty::as_returning())
            .get_result(conn)?)
    }

    /// Insert the counterparty, or update the names of the one with the same
    /// uuid
    pub fn upsert(self, conn: &mut Conn) -> Result<Counterparty> {
        Ok(diesel::insert_into(counterparties::table)
            .values(self)
            .on_conflict(counterparties::uuid)
            .do_update()
            .set((
                counterparties::name.eq(excluded(counterparties::name)),
                counterparties::display_name.eq(excluded(counterparties::display_name)),
            ))
            .returning(Counterparty::as_returning())
            .get_result(conn)?)
    }
}

#[derive(Default, Clone, AsChangeset)]
#[diesel(table_name = counterparties)]
pub struct ChangeCounterparty<'a> {
    pub name: Option<&'a str>,
    pub display_name: Option<Option<&'a str>>,
}

impl ChangeCounterparty<'_> {
    pub fn save(self, conn: &mut Conn, counterparty: &Counterparty) -> Result<()> {
        diesel::update(counterparty).set(self).execute(conn)?;
        Ok(())
    }

    pub fn apply(self, conn: &mut Conn, counterparty: &mut Counterparty) -> Result<()> {
        self.clone().save(conn, counterparty)?;

        if let Some(value) = self.name {
            counterparty.name = value.to_string();
        }
        if let Some(value) = self.display_name {
            counterparty.display_name = value.map(str::to_string);
        }

        Ok(())
    }
}
